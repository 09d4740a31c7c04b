//! Native entry points of a libretro core
//!
//! [`RetroApi`] is the seam between the adapter and whatever provides the
//! core's symbols. [`CoreSymbols`] is the table a dynamic or static loader
//! fills in.

use crate::abi::*;
use std::ffi::{c_uint, c_void};

/// Raw libretro entry points.
///
/// # Safety
/// Implementations must behave like a libretro core: pointers passed in are
/// only valid for the duration of the call, callbacks are invoked
/// synchronously on the calling thread, and out-parameters are fully
/// written before returning.
pub unsafe trait RetroApi {
    unsafe fn set_environment(&self, callback: RetroEnvironmentFn);
    unsafe fn set_video_refresh(&self, callback: RetroVideoRefreshFn);
    unsafe fn set_audio_sample(&self, callback: RetroAudioSampleFn);
    unsafe fn set_audio_sample_batch(&self, callback: RetroAudioSampleBatchFn);
    unsafe fn set_input_poll(&self, callback: RetroInputPollFn);
    unsafe fn set_input_state(&self, callback: RetroInputStateFn);

    unsafe fn init(&self);
    unsafe fn deinit(&self);
    unsafe fn api_version(&self) -> c_uint;
    unsafe fn get_system_info(&self, info: *mut RetroSystemInfo);
    unsafe fn get_system_av_info(&self, info: *mut RetroSystemAvInfo);
    unsafe fn set_controller_port_device(&self, port: c_uint, device: c_uint);
    unsafe fn reset(&self);
    unsafe fn run(&self);
    unsafe fn serialize_size(&self) -> usize;
    unsafe fn serialize(&self, data: *mut c_void, size: usize) -> bool;
    unsafe fn unserialize(&self, data: *const c_void, size: usize) -> bool;
    unsafe fn load_game(&self, game: *const RetroGameInfo) -> bool;
    unsafe fn unload_game(&self);
}

/// Resolved `retro_*` symbols of one core library
#[derive(Debug, Clone, Copy)]
pub struct CoreSymbols {
    pub retro_set_environment: unsafe extern "C" fn(RetroEnvironmentFn),
    pub retro_set_video_refresh: unsafe extern "C" fn(RetroVideoRefreshFn),
    pub retro_set_audio_sample: unsafe extern "C" fn(RetroAudioSampleFn),
    pub retro_set_audio_sample_batch: unsafe extern "C" fn(RetroAudioSampleBatchFn),
    pub retro_set_input_poll: unsafe extern "C" fn(RetroInputPollFn),
    pub retro_set_input_state: unsafe extern "C" fn(RetroInputStateFn),
    pub retro_init: unsafe extern "C" fn(),
    pub retro_deinit: unsafe extern "C" fn(),
    pub retro_api_version: unsafe extern "C" fn() -> c_uint,
    pub retro_get_system_info: unsafe extern "C" fn(*mut RetroSystemInfo),
    pub retro_get_system_av_info: unsafe extern "C" fn(*mut RetroSystemAvInfo),
    pub retro_set_controller_port_device: unsafe extern "C" fn(c_uint, c_uint),
    pub retro_reset: unsafe extern "C" fn(),
    pub retro_run: unsafe extern "C" fn(),
    pub retro_serialize_size: unsafe extern "C" fn() -> usize,
    pub retro_serialize: unsafe extern "C" fn(*mut c_void, usize) -> bool,
    pub retro_unserialize: unsafe extern "C" fn(*const c_void, usize) -> bool,
    pub retro_load_game: unsafe extern "C" fn(*const RetroGameInfo) -> bool,
    pub retro_unload_game: unsafe extern "C" fn(),
}

// Safety: the symbols come from a real libretro core, which upholds the
// trait contract by definition.
unsafe impl RetroApi for CoreSymbols {
    unsafe fn set_environment(&self, callback: RetroEnvironmentFn) {
        (self.retro_set_environment)(callback)
    }

    unsafe fn set_video_refresh(&self, callback: RetroVideoRefreshFn) {
        (self.retro_set_video_refresh)(callback)
    }

    unsafe fn set_audio_sample(&self, callback: RetroAudioSampleFn) {
        (self.retro_set_audio_sample)(callback)
    }

    unsafe fn set_audio_sample_batch(&self, callback: RetroAudioSampleBatchFn) {
        (self.retro_set_audio_sample_batch)(callback)
    }

    unsafe fn set_input_poll(&self, callback: RetroInputPollFn) {
        (self.retro_set_input_poll)(callback)
    }

    unsafe fn set_input_state(&self, callback: RetroInputStateFn) {
        (self.retro_set_input_state)(callback)
    }

    unsafe fn init(&self) {
        (self.retro_init)()
    }

    unsafe fn deinit(&self) {
        (self.retro_deinit)()
    }

    unsafe fn api_version(&self) -> c_uint {
        (self.retro_api_version)()
    }

    unsafe fn get_system_info(&self, info: *mut RetroSystemInfo) {
        (self.retro_get_system_info)(info)
    }

    unsafe fn get_system_av_info(&self, info: *mut RetroSystemAvInfo) {
        (self.retro_get_system_av_info)(info)
    }

    unsafe fn set_controller_port_device(&self, port: c_uint, device: c_uint) {
        (self.retro_set_controller_port_device)(port, device)
    }

    unsafe fn reset(&self) {
        (self.retro_reset)()
    }

    unsafe fn run(&self) {
        (self.retro_run)()
    }

    unsafe fn serialize_size(&self) -> usize {
        (self.retro_serialize_size)()
    }

    unsafe fn serialize(&self, data: *mut c_void, size: usize) -> bool {
        (self.retro_serialize)(data, size)
    }

    unsafe fn unserialize(&self, data: *const c_void, size: usize) -> bool {
        (self.retro_unserialize)(data, size)
    }

    unsafe fn load_game(&self, game: *const RetroGameInfo) -> bool {
        (self.retro_load_game)(game)
    }

    unsafe fn unload_game(&self) {
        (self.retro_unload_game)()
    }
}
