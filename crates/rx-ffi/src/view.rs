//! Borrowed views over buffers the core passes to callbacks

use std::ffi::c_void;

/// Bytes of a video frame, `height` rows of `pitch` bytes.
/// Returns `None` for a dupe (null) frame.
///
/// # Safety
/// `data` must be null or valid for `height * pitch` bytes for `'a`.
pub unsafe fn frame_bytes<'a>(data: *const c_void, height: u32, pitch: usize) -> Option<&'a [u8]> {
    if data.is_null() {
        return None;
    }
    Some(std::slice::from_raw_parts(data as *const u8, height as usize * pitch))
}

/// Interleaved stereo samples of `frames` audio frames
///
/// # Safety
/// `data` must be null or valid for `frames * 2` samples for `'a`.
pub unsafe fn audio_samples<'a>(data: *const i16, frames: usize) -> &'a [i16] {
    if data.is_null() || frames == 0 {
        return &[];
    }
    std::slice::from_raw_parts(data, frames * 2)
}
