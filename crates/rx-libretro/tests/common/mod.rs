//! Scripted libretro core used to drive the adapter from the outside
//!
//! `MockCore` behaves like a small native core: it calls back into the
//! frontend with real `#[repr(C)]` payloads and records what it saw.

#![allow(dead_code)]

use parking_lot::Mutex;
use rx_core::{FileAccess, FileStream, HostFileSystem};
use rx_ffi::abi::*;
use rx_ffi::RetroApi;
use std::collections::HashMap;
use std::ffi::{c_uint, c_void, CStr};
use std::io::{self, Cursor};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

pub const STATE_SIZE: usize = 512;
pub const FRAME_WIDTH: u32 = 320;
pub const FRAME_HEIGHT: u32 = 240;
pub const FRAME_PITCH: usize = 1280;
pub const AUDIO_FRAMES: usize = 735;
pub const DUALSHOCK: u32 = 0x105;

/// How the core reacts
#[derive(Debug, Clone)]
pub struct Behavior {
    pub name: Option<&'static CStr>,
    pub extensions: &'static CStr,
    pub need_fullpath: bool,
    pub block_extract: bool,
    pub accept_load: bool,
    pub serialize_ok: bool,
    pub state_size: usize,
    pub rotation_on_load: Option<u32>,
    pub null_frames: bool,
    pub vfs_version: Option<u32>,
}

impl Default for Behavior {
    fn default() -> Self {
        Self {
            name: Some(c"Mock PSX"),
            extensions: c"cue|bin||chd",
            need_fullpath: false,
            block_extract: true,
            accept_load: true,
            serialize_ok: true,
            state_size: STATE_SIZE,
            rotation_on_load: None,
            null_frames: false,
            vfs_version: None,
        }
    }
}

/// What the core observed
#[derive(Debug, Default)]
pub struct Record {
    pub calls: Vec<&'static str>,
    pub loaded_path: Option<String>,
    pub loaded_data: Option<Vec<u8>>,
    pub port_devices: Vec<(u32, u32)>,
    pub audio_consumed: Vec<usize>,
    pub input_values: Vec<i16>,
    pub system_dir: Option<String>,
    pub save_dir: Option<String>,
    pub frame_duping: Option<String>,
    pub can_dupe: Option<bool>,
    pub vfs_reply: Option<(u32, bool)>,
    pub vfs_game_size: Option<i64>,
}

#[derive(Default, Clone, Copy)]
struct Callbacks {
    environment: Option<RetroEnvironmentFn>,
    video_refresh: Option<RetroVideoRefreshFn>,
    audio_sample: Option<RetroAudioSampleFn>,
    audio_sample_batch: Option<RetroAudioSampleBatchFn>,
    input_poll: Option<RetroInputPollFn>,
    input_state: Option<RetroInputStateFn>,
}

#[derive(Default)]
struct Inner {
    behavior: Behavior,
    record: Record,
    callbacks: Callbacks,
    machine: Vec<u8>,
    vfs: Option<RetroVfsInterface>,
}

/// Cloning shares the underlying core, so tests keep a handle after
/// moving one into the adapter.
#[derive(Clone)]
pub struct MockCore {
    inner: Arc<Mutex<Inner>>,
}

impl MockCore {
    pub fn new(behavior: Behavior) -> Self {
        let machine = (0..behavior.state_size).map(|i| i as u8).collect();
        Self {
            inner: Arc::new(Mutex::new(Inner {
                behavior,
                machine,
                ..Default::default()
            })),
        }
    }

    pub fn with_record<R>(&self, f: impl FnOnce(&Record) -> R) -> R {
        f(&self.inner.lock().record)
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.inner.lock().record.calls.clone()
    }

    pub fn machine(&self) -> Vec<u8> {
        self.inner.lock().machine.clone()
    }

    pub fn update_behavior(&self, f: impl FnOnce(&mut Behavior)) {
        f(&mut self.inner.lock().behavior);
    }

    fn log(&self, call: &'static str) {
        self.inner.lock().record.calls.push(call);
    }

    fn callbacks(&self) -> Callbacks {
        self.inner.lock().callbacks
    }

    fn behavior(&self) -> Behavior {
        self.inner.lock().behavior.clone()
    }

    /// Call the environment callback without holding the lock
    fn env<T>(&self, command: u32, payload: &mut T) -> bool {
        match self.callbacks().environment {
            Some(environment) => unsafe { environment(command, payload as *mut T as *mut c_void) },
            None => false,
        }
    }

    fn read_variable(&self, key: &'static CStr) -> Option<String> {
        let mut variable = RetroVariable {
            key: key.as_ptr(),
            value: std::ptr::null(),
        };
        if self.env(env::GET_VARIABLE, &mut variable) && !variable.value.is_null() {
            Some(unsafe { CStr::from_ptr(variable.value) }.to_string_lossy().into_owned())
        } else {
            None
        }
    }

    fn read_directory(&self, command: u32) -> Option<String> {
        let mut dir: *const std::ffi::c_char = std::ptr::null();
        if self.env(command, &mut dir) && !dir.is_null() {
            Some(unsafe { CStr::from_ptr(dir) }.to_string_lossy().into_owned())
        } else {
            None
        }
    }

    /// Size of `path` as seen through the negotiated VFS
    fn vfs_size(&self, path: *const std::ffi::c_char) -> Option<i64> {
        let vfs = self.inner.lock().vfs?;
        unsafe {
            let handle = (vfs.open)(path, 1, 0);
            if handle.is_null() {
                return Some(-1);
            }
            let size = (vfs.size)(handle);
            (vfs.close)(handle);
            Some(size)
        }
    }
}

unsafe impl RetroApi for MockCore {
    unsafe fn set_environment(&self, callback: RetroEnvironmentFn) {
        self.inner.lock().callbacks.environment = Some(callback);

        let mut variables = [
            RetroVariable {
                key: c"beetle_psx_frame_duping".as_ptr(),
                value: c"frame_duping; disabled|enabled".as_ptr(),
            },
            RetroVariable {
                key: c"beetle_psx_internal_resolution".as_ptr(),
                value: c"Internal GPU resolution; 1x(native)|2x|4x|8x".as_ptr(),
            },
            RetroVariable {
                key: std::ptr::null(),
                value: std::ptr::null(),
            },
        ];
        self.env(env::SET_VARIABLES, &mut variables);

        let port0 = [
            RetroControllerDescription { desc: c"PlayStation Controller".as_ptr(), id: 1 },
            RetroControllerDescription { desc: c"DualShock".as_ptr(), id: DUALSHOCK },
            RetroControllerDescription { desc: c"Analog Controller".as_ptr(), id: 5 },
        ];
        let port1 = [
            RetroControllerDescription { desc: c"PlayStation Controller".as_ptr(), id: 1 },
            RetroControllerDescription { desc: c"Analog Controller".as_ptr(), id: 5 },
        ];
        let mut ports = [
            RetroControllerInfo { types: port0.as_ptr(), num_types: 3 },
            RetroControllerInfo { types: port1.as_ptr(), num_types: 2 },
            RetroControllerInfo { types: std::ptr::null(), num_types: 0 },
        ];
        self.env(env::SET_CONTROLLER_INFO, &mut ports);
    }

    unsafe fn set_video_refresh(&self, callback: RetroVideoRefreshFn) {
        self.inner.lock().callbacks.video_refresh = Some(callback);
    }

    unsafe fn set_audio_sample(&self, callback: RetroAudioSampleFn) {
        self.inner.lock().callbacks.audio_sample = Some(callback);
    }

    unsafe fn set_audio_sample_batch(&self, callback: RetroAudioSampleBatchFn) {
        self.inner.lock().callbacks.audio_sample_batch = Some(callback);
    }

    unsafe fn set_input_poll(&self, callback: RetroInputPollFn) {
        self.inner.lock().callbacks.input_poll = Some(callback);
    }

    unsafe fn set_input_state(&self, callback: RetroInputStateFn) {
        self.inner.lock().callbacks.input_state = Some(callback);
    }

    unsafe fn init(&self) {
        self.log("init");
        let system_dir = self.read_directory(env::GET_SYSTEM_DIRECTORY);
        let save_dir = self.read_directory(env::GET_SAVE_DIRECTORY);

        let mut can_dupe = 0u8;
        let can_dupe = self.env(env::GET_CAN_DUPE, &mut can_dupe).then_some(can_dupe != 0);

        let mut log = RetroLogCallback { log: ignore_log };
        if self.env(env::GET_LOG_INTERFACE, &mut log) {
            (log.log)(log_level::INFO, c"mock core initialized\n".as_ptr());
        }

        let mut vfs_reply = None;
        let mut vfs = None;
        if let Some(version) = self.behavior().vfs_version {
            let mut info = RetroVfsInterfaceInfo {
                required_interface_version: version,
                iface: std::ptr::null_mut(),
            };
            self.env(env::GET_VFS_INTERFACE, &mut info);
            vfs_reply = Some((info.required_interface_version, !info.iface.is_null()));
            if !info.iface.is_null() {
                vfs = Some(*info.iface);
            }
        }

        let mut inner = self.inner.lock();
        inner.record.system_dir = system_dir;
        inner.record.save_dir = save_dir;
        inner.record.can_dupe = can_dupe;
        inner.record.vfs_reply = vfs_reply;
        inner.vfs = vfs;
    }

    unsafe fn deinit(&self) {
        self.log("deinit");
    }

    unsafe fn api_version(&self) -> c_uint {
        RETRO_API_VERSION
    }

    unsafe fn get_system_info(&self, info: *mut RetroSystemInfo) {
        let behavior = self.behavior();
        *info = RetroSystemInfo {
            library_name: behavior.name.map_or(std::ptr::null(), CStr::as_ptr),
            library_version: c"0.9.44".as_ptr(),
            valid_extensions: behavior.extensions.as_ptr(),
            need_fullpath: behavior.need_fullpath,
            block_extract: behavior.block_extract,
        };
    }

    unsafe fn get_system_av_info(&self, info: *mut RetroSystemAvInfo) {
        *info = RetroSystemAvInfo {
            geometry: RetroGameGeometry {
                base_width: FRAME_WIDTH,
                base_height: FRAME_HEIGHT,
                max_width: 640,
                max_height: 480,
                aspect_ratio: 4.0 / 3.0,
            },
            timing: RetroSystemTiming {
                fps: 59.94,
                sample_rate: 44100.0,
            },
        };
    }

    unsafe fn set_controller_port_device(&self, port: c_uint, device: c_uint) {
        self.inner.lock().record.port_devices.push((port, device));
    }

    unsafe fn reset(&self) {
        self.log("reset");
    }

    unsafe fn run(&self) {
        self.log("run");
        for byte in self.inner.lock().machine.iter_mut() {
            *byte = byte.wrapping_add(1);
        }

        let callbacks = self.callbacks();
        if let Some(input_poll) = callbacks.input_poll {
            input_poll();
        }
        if let Some(video_refresh) = callbacks.video_refresh {
            if self.behavior().null_frames {
                video_refresh(std::ptr::null(), FRAME_WIDTH, FRAME_HEIGHT, FRAME_PITCH);
            } else {
                let frame = vec![0x1Fu8; FRAME_PITCH * FRAME_HEIGHT as usize];
                video_refresh(frame.as_ptr() as *const c_void, FRAME_WIDTH, FRAME_HEIGHT, FRAME_PITCH);
            }
        }
        if let Some(audio_sample) = callbacks.audio_sample {
            audio_sample(100, -100);
        }
        if let Some(audio_sample_batch) = callbacks.audio_sample_batch {
            let samples = vec![7i16; AUDIO_FRAMES * 2];
            let consumed = audio_sample_batch(samples.as_ptr(), AUDIO_FRAMES);
            self.inner.lock().record.audio_consumed.push(consumed);
        }
        if let Some(input_state) = callbacks.input_state {
            // Port 0, joypad, button A
            let value = input_state(0, 1, 0, 8);
            self.inner.lock().record.input_values.push(value);
        }
    }

    unsafe fn serialize_size(&self) -> usize {
        self.inner.lock().behavior.state_size
    }

    unsafe fn serialize(&self, data: *mut c_void, size: usize) -> bool {
        let inner = self.inner.lock();
        if !inner.behavior.serialize_ok || size < inner.machine.len() {
            return false;
        }
        std::ptr::copy_nonoverlapping(inner.machine.as_ptr(), data as *mut u8, inner.machine.len());
        true
    }

    unsafe fn unserialize(&self, data: *const c_void, size: usize) -> bool {
        let mut inner = self.inner.lock();
        if size != inner.machine.len() {
            return false;
        }
        let bytes = std::slice::from_raw_parts(data as *const u8, size);
        inner.machine.copy_from_slice(bytes);
        true
    }

    unsafe fn load_game(&self, game: *const RetroGameInfo) -> bool {
        self.log("load_game");
        let game = *game;
        let path = CStr::from_ptr(game.path).to_string_lossy().into_owned();
        let data = (!game.data.is_null())
            .then(|| std::slice::from_raw_parts(game.data as *const u8, game.size).to_vec());

        let behavior = self.behavior();
        if let Some(mut rotation) = behavior.rotation_on_load {
            self.env(env::SET_ROTATION, &mut rotation);
        }
        let mut format = 1u32;
        self.env(env::SET_PIXEL_FORMAT, &mut format);
        let frame_duping = self.read_variable(c"beetle_psx_frame_duping");
        let vfs_game_size = if behavior.need_fullpath { self.vfs_size(game.path) } else { None };

        let mut inner = self.inner.lock();
        inner.record.loaded_path = Some(path);
        inner.record.loaded_data = data;
        inner.record.frame_duping = frame_duping;
        inner.record.vfs_game_size = vfs_game_size;
        behavior.accept_load
    }

    unsafe fn unload_game(&self) {
        self.log("unload_game");
    }
}

unsafe extern "C" fn ignore_log(_level: c_uint, _fmt: *const std::ffi::c_char) {}

/// In-memory host file system. Writes are not persisted.
#[derive(Default)]
pub struct MemoryFileSystem {
    files: Mutex<HashMap<PathBuf, Vec<u8>>>,
    pub opened: AtomicUsize,
    pub closed: AtomicUsize,
}

impl MemoryFileSystem {
    pub fn with_file(path: impl Into<PathBuf>, contents: &[u8]) -> Self {
        let fs = Self::default();
        fs.files.lock().insert(path.into(), contents.to_vec());
        fs
    }

    pub fn closed(&self) -> usize {
        self.closed.load(Ordering::SeqCst)
    }
}

impl HostFileSystem for MemoryFileSystem {
    fn open(&self, path: &Path, _access: FileAccess) -> io::Result<Box<dyn FileStream>> {
        let contents = self
            .files
            .lock()
            .get(path)
            .cloned()
            .ok_or_else(|| io::Error::from(io::ErrorKind::NotFound))?;
        self.opened.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(Cursor::new(contents)))
    }

    fn close(&self, stream: Box<dyn FileStream>) {
        self.closed.fetch_add(1, Ordering::SeqCst);
        drop(stream);
    }
}

/// Route adapter logs to the test output. Safe to call from every test.
pub fn init_logging() {
    rx_core::logging::init(rx_core::LogLevel::Debug);
}
