//! Safe wrapper over a [`RetroApi`]
//!
//! Converts between the native layouts and the host types in `rx-core`.

use crate::abi::*;
use crate::api::RetroApi;
use rx_core::{GameGeometry, RetroError, SystemTimings};
use std::ffi::{c_char, c_uint, c_void, CStr};

/// Identity reported by `retro_get_system_info`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemInfo {
    pub name: String,
    pub version: String,
    /// Extensions without the leading dot
    pub extensions: Vec<String>,
    pub need_fullpath: bool,
    pub block_extract: bool,
}

impl From<RetroGameGeometry> for GameGeometry {
    fn from(raw: RetroGameGeometry) -> Self {
        Self {
            base_width: raw.base_width,
            base_height: raw.base_height,
            max_width: raw.max_width,
            max_height: raw.max_height,
            aspect_ratio: raw.aspect_ratio,
        }
    }
}

impl From<RetroSystemTiming> for SystemTimings {
    fn from(raw: RetroSystemTiming) -> Self {
        Self {
            fps: raw.fps,
            sample_rate: raw.sample_rate,
        }
    }
}

/// Copy a NUL-terminated string, replacing invalid UTF-8
///
/// # Safety
/// `ptr` must be null or point to a NUL-terminated string.
pub unsafe fn string_from_ptr(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        None
    } else {
        Some(CStr::from_ptr(ptr).to_string_lossy().into_owned())
    }
}

/// A core behind its raw entry points
pub struct NativeCore<A> {
    api: A,
}

impl<A: RetroApi> NativeCore<A> {
    pub fn new(api: A) -> Self {
        Self { api }
    }

    /// The wrapped entry points
    pub fn api(&self) -> &A {
        &self.api
    }

    /// Register all frontend callbacks. The environment callback goes
    /// first since cores may call it from the other setters.
    pub fn install_callbacks(&self, table: &CallbackTable) {
        unsafe {
            self.api.set_environment(table.environment);
            self.api.set_video_refresh(table.video_refresh);
            self.api.set_audio_sample(table.audio_sample);
            self.api.set_audio_sample_batch(table.audio_sample_batch);
            self.api.set_input_poll(table.input_poll);
            self.api.set_input_state(table.input_state);
        }
    }

    pub fn api_version(&self) -> u32 {
        unsafe { self.api.api_version() }
    }

    pub fn system_info(&self) -> Result<SystemInfo, RetroError> {
        let mut raw = RetroSystemInfo::default();
        unsafe { self.api.get_system_info(&mut raw) };

        let name = unsafe { string_from_ptr(raw.library_name) }
            .ok_or_else(|| RetroError::InvalidSystemInfo("library name is null".to_string()))?;
        let version = unsafe { string_from_ptr(raw.library_version) }.unwrap_or_default();
        let extensions = unsafe { string_from_ptr(raw.valid_extensions) }
            .unwrap_or_default()
            .split('|')
            .filter(|ext| !ext.is_empty())
            .map(str::to_string)
            .collect();

        Ok(SystemInfo {
            name,
            version,
            extensions,
            need_fullpath: raw.need_fullpath,
            block_extract: raw.block_extract,
        })
    }

    pub fn system_av_info(&self) -> (GameGeometry, SystemTimings) {
        let mut raw = RetroSystemAvInfo::default();
        unsafe { self.api.get_system_av_info(&mut raw) };
        (raw.geometry.into(), raw.timing.into())
    }

    pub fn init(&self) {
        unsafe { self.api.init() }
    }

    pub fn deinit(&self) {
        unsafe { self.api.deinit() }
    }

    pub fn reset(&self) {
        unsafe { self.api.reset() }
    }

    pub fn run(&self) {
        unsafe { self.api.run() }
    }

    pub fn set_controller_port_device(&self, port: u32, device: u32) {
        unsafe { self.api.set_controller_port_device(port as c_uint, device as c_uint) }
    }

    /// Load a game by path, optionally with its contents already in memory
    pub fn load_game(&self, path: &CStr, data: Option<&[u8]>) -> bool {
        let info = RetroGameInfo {
            path: path.as_ptr(),
            data: data.map_or(std::ptr::null(), |bytes| bytes.as_ptr() as *const c_void),
            size: data.map_or(0, <[u8]>::len),
            meta: std::ptr::null(),
        };
        unsafe { self.api.load_game(&info) }
    }

    pub fn unload_game(&self) {
        unsafe { self.api.unload_game() }
    }

    pub fn serialize_size(&self) -> usize {
        unsafe { self.api.serialize_size() }
    }

    /// Fill `buffer` with the current state
    pub fn serialize(&self, buffer: &mut [u8]) -> bool {
        unsafe { self.api.serialize(buffer.as_mut_ptr() as *mut c_void, buffer.len()) }
    }

    /// Restore state from `buffer`
    pub fn unserialize(&self, buffer: &[u8]) -> bool {
        unsafe { self.api.unserialize(buffer.as_ptr() as *const c_void, buffer.len()) }
    }
}
