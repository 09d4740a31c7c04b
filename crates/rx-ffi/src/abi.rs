//! Native libretro ABI
//!
//! Layouts and constants match `libretro.h`. Nothing outside this crate
//! touches these types directly.

use bytemuck::{Pod, Zeroable};
use std::ffi::{c_char, c_uint, c_void};

/// Version of the libretro API this adapter implements
pub const RETRO_API_VERSION: c_uint = 1;

/// Environment command ids
pub mod env {
    pub const SET_ROTATION: u32 = 1;
    pub const GET_OVERSCAN: u32 = 2;
    pub const GET_CAN_DUPE: u32 = 3;
    pub const GET_SYSTEM_DIRECTORY: u32 = 9;
    pub const SET_PIXEL_FORMAT: u32 = 10;
    pub const GET_VARIABLE: u32 = 15;
    pub const SET_VARIABLES: u32 = 16;
    pub const GET_LOG_INTERFACE: u32 = 27;
    pub const GET_SAVE_DIRECTORY: u32 = 31;
    pub const SET_SYSTEM_AV_INFO: u32 = 32;
    pub const SET_CONTROLLER_INFO: u32 = 35;
    pub const SET_GEOMETRY: u32 = 37;

    /// Flag on commands that are not yet part of the stable API
    pub const EXPERIMENTAL: u32 = 0x10000;
    pub const GET_VFS_INTERFACE: u32 = 45 | EXPERIMENTAL;
}

/// Log levels reported through the log interface
pub mod log_level {
    pub const DEBUG: u32 = 0;
    pub const INFO: u32 = 1;
    pub const WARN: u32 = 2;
    pub const ERROR: u32 = 3;
}

/// VFS seek origins
pub mod vfs_seek {
    pub const START: i32 = 0;
    pub const CURRENT: i32 = 1;
    pub const END: i32 = 2;
}

/// `retro_system_info`
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct RetroSystemInfo {
    pub library_name: *const c_char,
    pub library_version: *const c_char,
    /// `'|'`-separated, without dots
    pub valid_extensions: *const c_char,
    pub need_fullpath: bool,
    pub block_extract: bool,
}

impl Default for RetroSystemInfo {
    fn default() -> Self {
        Self {
            library_name: std::ptr::null(),
            library_version: std::ptr::null(),
            valid_extensions: std::ptr::null(),
            need_fullpath: false,
            block_extract: false,
        }
    }
}

/// `retro_game_geometry`
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct RetroGameGeometry {
    pub base_width: c_uint,
    pub base_height: c_uint,
    pub max_width: c_uint,
    pub max_height: c_uint,
    pub aspect_ratio: f32,
}

/// `retro_system_timing`
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct RetroSystemTiming {
    pub fps: f64,
    pub sample_rate: f64,
}

/// `retro_system_av_info`
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RetroSystemAvInfo {
    pub geometry: RetroGameGeometry,
    pub timing: RetroSystemTiming,
}

/// `retro_game_info`
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct RetroGameInfo {
    pub path: *const c_char,
    pub data: *const c_void,
    pub size: usize,
    pub meta: *const c_char,
}

/// `retro_variable`. Arrays of these end with a null `key`.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct RetroVariable {
    pub key: *const c_char,
    pub value: *const c_char,
}

/// `retro_controller_description`
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct RetroControllerDescription {
    pub desc: *const c_char,
    pub id: c_uint,
}

/// `retro_controller_info`. Arrays of these end with a null `types`.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct RetroControllerInfo {
    pub types: *const RetroControllerDescription,
    pub num_types: c_uint,
}

/// Log callback. Variadic on the native side; only the fixed arguments
/// are read.
pub type RetroLogPrintfFn = unsafe extern "C" fn(level: c_uint, fmt: *const c_char);

/// `retro_log_callback`
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct RetroLogCallback {
    pub log: RetroLogPrintfFn,
}

/// Opaque VFS file handle owned by the frontend
#[repr(C)]
pub struct RetroVfsFileHandle {
    _private: [u8; 0],
}

/// `retro_vfs_interface`, version 2 subset
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct RetroVfsInterface {
    pub get_path: unsafe extern "C" fn(stream: *mut RetroVfsFileHandle) -> *const c_char,
    pub open: unsafe extern "C" fn(path: *const c_char, mode: c_uint, hints: c_uint) -> *mut RetroVfsFileHandle,
    pub close: unsafe extern "C" fn(stream: *mut RetroVfsFileHandle) -> i32,
    pub size: unsafe extern "C" fn(stream: *mut RetroVfsFileHandle) -> i64,
    pub tell: unsafe extern "C" fn(stream: *mut RetroVfsFileHandle) -> i64,
    pub seek: unsafe extern "C" fn(stream: *mut RetroVfsFileHandle, offset: i64, seek_position: i32) -> i64,
    pub read: unsafe extern "C" fn(stream: *mut RetroVfsFileHandle, s: *mut c_void, len: u64) -> i64,
    pub write: unsafe extern "C" fn(stream: *mut RetroVfsFileHandle, s: *const c_void, len: u64) -> i64,
    pub flush: unsafe extern "C" fn(stream: *mut RetroVfsFileHandle) -> i32,
    pub remove: unsafe extern "C" fn(path: *const c_char) -> i32,
    pub rename: unsafe extern "C" fn(old_path: *const c_char, new_path: *const c_char) -> i32,
    // v2
    pub truncate: unsafe extern "C" fn(stream: *mut RetroVfsFileHandle, length: i64) -> i64,
}

/// `retro_vfs_interface_info`
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct RetroVfsInterfaceInfo {
    pub required_interface_version: u32,
    pub iface: *mut RetroVfsInterface,
}

/// Callback signatures registered with the core
pub type RetroEnvironmentFn = unsafe extern "C" fn(cmd: c_uint, data: *mut c_void) -> bool;
pub type RetroVideoRefreshFn = unsafe extern "C" fn(data: *const c_void, width: c_uint, height: c_uint, pitch: usize);
pub type RetroAudioSampleFn = unsafe extern "C" fn(left: i16, right: i16);
pub type RetroAudioSampleBatchFn = unsafe extern "C" fn(data: *const i16, frames: usize) -> usize;
pub type RetroInputPollFn = unsafe extern "C" fn();
pub type RetroInputStateFn = unsafe extern "C" fn(port: c_uint, device: c_uint, index: c_uint, id: c_uint) -> i16;

/// The full set of frontend callbacks, installed together
#[derive(Debug, Clone, Copy)]
pub struct CallbackTable {
    pub environment: RetroEnvironmentFn,
    pub video_refresh: RetroVideoRefreshFn,
    pub audio_sample: RetroAudioSampleFn,
    pub audio_sample_batch: RetroAudioSampleBatchFn,
    pub input_poll: RetroInputPollFn,
    pub input_state: RetroInputStateFn,
}
