//! Frame delivery to host observers
//!
//! Views handed to observers borrow the core's buffers and are only valid
//! for the duration of the notification.

use crate::state::Shared;
use rx_core::{InputType, VideoFrame};

pub(crate) fn deliver_video(shared: &Shared, data: Option<&[u8]>, width: u32, height: u32, pitch: usize) {
    let frame = VideoFrame {
        data,
        width,
        height,
        pitch: u32::try_from(pitch).unwrap_or(u32::MAX),
    };
    shared.events.emit_video_frame(frame);
}

/// One stereo frame
pub(crate) fn deliver_audio_sample(shared: &Shared, left: i16, right: i16) {
    shared.events.emit_audio_frames(&[left, right], 1);
}

/// Interleaved stereo frames. Returns the frames consumed as reported by
/// the last observer; all of them when nobody listens.
pub(crate) fn deliver_audio_batch(shared: &Shared, samples: &[i16], frames: usize) -> usize {
    let count = u32::try_from(frames).unwrap_or(u32::MAX);
    match shared.events.emit_audio_frames(samples, count) {
        Some(consumed) => consumed as usize,
        None => frames,
    }
}

pub(crate) fn poll_input(shared: &Shared) {
    shared.events.poll_input();
}

pub(crate) fn input_state(shared: &Shared, port: u32, device: u32, index: u32, id: u32) -> i16 {
    match InputType::from_native(device, index, id) {
        Some(input) => shared.events.input_state(port, input),
        None => {
            tracing::trace!("No input mapping for device {:#x} index {} id {}", device, index, id);
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use rx_core::input::device;
    use std::sync::Arc;

    fn shared() -> Shared {
        Shared::new(Vec::new(), None, false)
    }

    #[test]
    fn test_video_dupe_and_data() {
        let shared = shared();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        shared.events.on_video_frame(move |frame| {
            sink.lock().push((frame.data.map(<[u8]>::len), frame.width, frame.pitch));
        });

        let pixels = vec![0u8; 4 * 8];
        deliver_video(&shared, Some(&pixels), 2, 4, 8);
        deliver_video(&shared, None, 2, 4, 8);
        assert_eq!(*seen.lock(), vec![(Some(32), 2, 8), (None, 2, 8)]);
    }

    #[test]
    fn test_audio_without_observers_drops_everything() {
        let shared = shared();
        assert_eq!(deliver_audio_batch(&shared, &[0; 16], 8), 8);
    }

    #[test]
    fn test_audio_backpressure_relayed() {
        let shared = shared();
        let samples = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&samples);
        shared.events.on_audio_frames(move |data, frames| {
            sink.lock().extend_from_slice(data);
            frames / 2
        });

        assert_eq!(deliver_audio_batch(&shared, &[1, 2, 3, 4], 2), 1);
        deliver_audio_sample(&shared, 5, 6);
        assert_eq!(*samples.lock(), vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_input_state_mapping() {
        let shared = shared();
        assert_eq!(input_state(&shared, 0, device::JOYPAD, 0, 8), 0);

        shared.events.set_input_state(Some(Box::new(|_port: u32, input: InputType| -> i16 {
            match input {
                InputType::JoypadA => 1,
                InputType::AnalogLeftX => -0x4000,
                _ => 0,
            }
        })));
        assert_eq!(input_state(&shared, 0, device::JOYPAD, 0, 8), 1);
        assert_eq!(input_state(&shared, 0, device::subclass(device::JOYPAD, 1), 0, 8), 1);
        assert_eq!(input_state(&shared, 0, device::ANALOG, 0, 0), -0x4000);
        // Keyboard is not mapped
        assert_eq!(input_state(&shared, 0, device::KEYBOARD, 0, 8), 0);
    }
}
