//! `extern "C"` callbacks registered with the core
//!
//! Each trampoline resolves the adapter from the thread's call context and
//! forwards to safe code. Panics never cross back into the core.

use crate::bridge;
use crate::context;
use crate::environment;
use crate::state::Shared;
use rx_ffi::abi::{log_level, CallbackTable};
use rx_ffi::native::string_from_ptr;
use rx_ffi::{audio_samples, frame_bytes, EnvPayload};
use std::ffi::{c_char, c_uint, c_void};
use std::panic::{self, AssertUnwindSafe};
use tracing::{debug, error, info, warn};

/// Callbacks installed on every core
pub(crate) const CALLBACKS: CallbackTable = CallbackTable {
    environment,
    video_refresh,
    audio_sample,
    audio_sample_batch,
    input_poll,
    input_state,
};

/// Run `call`, answering `neutral` if it panics
pub(crate) fn shield<R>(name: &str, neutral: R, call: impl FnOnce() -> R) -> R {
    match panic::catch_unwind(AssertUnwindSafe(call)) {
        Ok(value) => value,
        Err(_) => {
            error!("Host handler panicked in {} callback", name);
            neutral
        }
    }
}

/// Run `call` against the adapter owning the current native call
fn guarded<R>(name: &str, neutral: R, call: impl FnOnce(&Shared) -> R) -> R {
    let Some(shared) = context::active() else {
        warn!("{} callback outside of any adapter call", name);
        return neutral;
    };
    shield(name, neutral, || call(&shared))
}

unsafe extern "C" fn environment(cmd: c_uint, data: *mut c_void) -> bool {
    let payload = EnvPayload::new(data);
    guarded("environment", false, |shared| environment::dispatch(shared, cmd, payload))
}

unsafe extern "C" fn video_refresh(data: *const c_void, width: c_uint, height: c_uint, pitch: usize) {
    let frame = frame_bytes(data, height, pitch);
    guarded("video_refresh", (), |shared| {
        bridge::deliver_video(shared, frame, width, height, pitch)
    })
}

unsafe extern "C" fn audio_sample(left: i16, right: i16) {
    guarded("audio_sample", (), |shared| bridge::deliver_audio_sample(shared, left, right))
}

unsafe extern "C" fn audio_sample_batch(data: *const i16, frames: usize) -> usize {
    let samples = audio_samples(data, frames);
    guarded("audio_sample_batch", frames, |shared| {
        bridge::deliver_audio_batch(shared, samples, frames)
    })
}

unsafe extern "C" fn input_poll() {
    guarded("input_poll", (), bridge::poll_input)
}

unsafe extern "C" fn input_state(port: c_uint, device: c_uint, index: c_uint, id: c_uint) -> i16 {
    guarded("input_state", 0, |shared| bridge::input_state(shared, port, device, index, id))
}

/// Log interface handed out through `GET_LOG_INTERFACE`. Only the format
/// string is read; variadic arguments are not expanded.
pub(crate) unsafe extern "C" fn log_message(level: c_uint, fmt: *const c_char) {
    let enabled = context::active().map_or(true, |shared| shared.log_core_messages);
    if !enabled {
        return;
    }
    let Some(message) = string_from_ptr(fmt) else {
        return;
    };
    let message = message.trim_end();

    match level {
        log_level::DEBUG => debug!(target: "libretro", "{}", message),
        log_level::INFO => info!(target: "libretro", "{}", message),
        log_level::WARN => warn!(target: "libretro", "{}", message),
        log_level::ERROR => error!(target: "libretro", "{}", message),
        _ => info!(target: "libretro", "[level {}] {}", level, message),
    }
}
