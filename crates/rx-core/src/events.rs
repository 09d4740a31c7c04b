//! Observer registry for core notifications
//!
//! Notifications are delivered synchronously on the thread running the
//! core. Each emit works on a snapshot of the handler list, so handlers
//! may subscribe or unsubscribe from inside a notification; the change
//! takes effect from the next emit.

use crate::input::InputType;
use crate::types::{GameGeometry, PixelFormat, Rotation, SystemTimings, VideoFrame};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Video frame observer
pub type RenderVideoFrameFn = dyn FnMut(VideoFrame<'_>) + Send;
/// Audio observer. Receives interleaved stereo samples and the frame count,
/// returns how many frames it accepted.
pub type RenderAudioFramesFn = dyn FnMut(&[i16], u32) -> u32 + Send;
pub type PixelFormatChangedFn = dyn FnMut(PixelFormat) + Send;
pub type GeometryChangedFn = dyn FnMut(GameGeometry) + Send;
pub type TimingsChangedFn = dyn FnMut(SystemTimings) + Send;
pub type RotationChangedFn = dyn FnMut(Rotation) + Send;
pub type PollInputFn = dyn FnMut() + Send;
/// Input state query: `(port, control) -> value`
pub type GetInputStateFn = dyn FnMut(u32, InputType) -> i16 + Send;

/// Handle returned by every `on_*` call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Handler<F> = Arc<Mutex<Box<F>>>;

/// Ordered list of handlers of one kind
struct Observers<F: ?Sized> {
    handlers: Mutex<Vec<(SubscriptionId, Handler<F>)>>,
}

impl<F: ?Sized> Observers<F> {
    fn new() -> Self {
        Self {
            handlers: Mutex::new(Vec::new()),
        }
    }

    fn add(&self, id: SubscriptionId, handler: Box<F>) {
        self.handlers.lock().push((id, Arc::new(Mutex::new(handler))));
    }

    fn remove(&self, id: SubscriptionId) -> bool {
        let mut handlers = self.handlers.lock();
        let before = handlers.len();
        handlers.retain(|(existing, _)| *existing != id);
        handlers.len() != before
    }

    fn len(&self) -> usize {
        self.handlers.lock().len()
    }

    /// Run `call` on every handler in subscription order, returning the
    /// last handler's result
    fn emit<R>(&self, mut call: impl FnMut(&mut F) -> R) -> Option<R> {
        let snapshot: Vec<Handler<F>> = self
            .handlers
            .lock()
            .iter()
            .map(|(_, handler)| Arc::clone(handler))
            .collect();

        let mut last = None;
        for handler in snapshot {
            let mut handler = handler.lock();
            last = Some(call(&mut **handler));
        }
        last
    }
}

/// Every notification and host callback a core can drive
pub struct CoreEvents {
    next_id: AtomicU64,
    video: Observers<RenderVideoFrameFn>,
    audio: Observers<RenderAudioFramesFn>,
    pixel_format: Observers<PixelFormatChangedFn>,
    geometry: Observers<GeometryChangedFn>,
    timings: Observers<TimingsChangedFn>,
    rotation: Observers<RotationChangedFn>,
    poll_input: Mutex<Option<Box<PollInputFn>>>,
    input_state: Mutex<Option<Box<GetInputStateFn>>>,
}

impl CoreEvents {
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            video: Observers::new(),
            audio: Observers::new(),
            pixel_format: Observers::new(),
            geometry: Observers::new(),
            timings: Observers::new(),
            rotation: Observers::new(),
            poll_input: Mutex::new(None),
            input_state: Mutex::new(None),
        }
    }

    fn next_id(&self) -> SubscriptionId {
        SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    pub fn on_video_frame(&self, handler: impl FnMut(VideoFrame<'_>) + Send + 'static) -> SubscriptionId {
        let id = self.next_id();
        self.video.add(id, Box::new(handler));
        id
    }

    pub fn on_audio_frames(&self, handler: impl FnMut(&[i16], u32) -> u32 + Send + 'static) -> SubscriptionId {
        let id = self.next_id();
        self.audio.add(id, Box::new(handler));
        id
    }

    pub fn on_pixel_format_changed(&self, handler: impl FnMut(PixelFormat) + Send + 'static) -> SubscriptionId {
        let id = self.next_id();
        self.pixel_format.add(id, Box::new(handler));
        id
    }

    pub fn on_geometry_changed(&self, handler: impl FnMut(GameGeometry) + Send + 'static) -> SubscriptionId {
        let id = self.next_id();
        self.geometry.add(id, Box::new(handler));
        id
    }

    pub fn on_timings_changed(&self, handler: impl FnMut(SystemTimings) + Send + 'static) -> SubscriptionId {
        let id = self.next_id();
        self.timings.add(id, Box::new(handler));
        id
    }

    pub fn on_rotation_changed(&self, handler: impl FnMut(Rotation) + Send + 'static) -> SubscriptionId {
        let id = self.next_id();
        self.rotation.add(id, Box::new(handler));
        id
    }

    /// Remove a subscription of any kind. Returns whether it existed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.video.remove(id)
            || self.audio.remove(id)
            || self.pixel_format.remove(id)
            || self.geometry.remove(id)
            || self.timings.remove(id)
            || self.rotation.remove(id)
    }

    /// Replace the input poll handler
    pub fn set_poll_input(&self, handler: Option<Box<PollInputFn>>) {
        *self.poll_input.lock() = handler;
    }

    /// Replace the input state handler
    pub fn set_input_state(&self, handler: Option<Box<GetInputStateFn>>) {
        *self.input_state.lock() = handler;
    }

    pub fn emit_video_frame(&self, frame: VideoFrame<'_>) {
        self.video.emit(|handler| handler(frame));
    }

    /// Deliver audio. `None` when nobody is listening.
    pub fn emit_audio_frames(&self, samples: &[i16], frames: u32) -> Option<u32> {
        self.audio.emit(|handler| handler(samples, frames))
    }

    pub fn emit_pixel_format(&self, format: PixelFormat) {
        self.pixel_format.emit(|handler| handler(format));
    }

    pub fn emit_geometry(&self, geometry: GameGeometry) {
        self.geometry.emit(|handler| handler(geometry));
    }

    pub fn emit_timings(&self, timings: SystemTimings) {
        self.timings.emit(|handler| handler(timings));
    }

    pub fn emit_rotation(&self, rotation: Rotation) {
        self.rotation.emit(|handler| handler(rotation));
    }

    pub fn poll_input(&self) {
        if let Some(handler) = self.poll_input.lock().as_mut() {
            handler();
        }
    }

    /// Query the host for one control. Zero when no handler is set.
    pub fn input_state(&self, port: u32, input: InputType) -> i16 {
        self.input_state
            .lock()
            .as_mut()
            .map_or(0, |handler| handler(port, input))
    }

    /// Number of video and audio observers
    pub fn frame_observer_count(&self) -> (usize, usize) {
        (self.video.len(), self.audio.len())
    }
}

impl Default for CoreEvents {
    fn default() -> Self {
        Self::new()
    }
}
