//! The libretro core adapter
//!
//! [`RetroCore`] drives a native core through its [`RetroApi`] and exposes
//! it to the host as a [`Core`].

use crate::callbacks::CALLBACKS;
use crate::context::CallScope;
use crate::state::{DisplayState, Shared};
use rx_core::{
    Config, ControllerDescription, Core, CoreEvents, CoreOptions, FileAccess, FileDependency,
    FileStream, GameGeometry, HostFileSystem, LifecycleState, OptionOverride, PixelFormat, Result,
    Rotation, SystemTimings,
};
use rx_ffi::abi::RETRO_API_VERSION;
use rx_ffi::{NativeCore, RetroApi};
use std::ffi::CString;
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Construction-time settings of a [`RetroCore`]
#[derive(Debug, Clone)]
pub struct CoreSettings {
    /// Files the core expects in its system directory
    pub dependencies: Vec<FileDependency>,
    /// Option selections forced after every declaration
    pub option_overrides: Vec<OptionOverride>,
    /// Device id tried first when picking controllers
    pub preferred_input_device: Option<u32>,
    pub system_root_path: Option<String>,
    pub save_root_path: Option<String>,
    /// Forward the core's own log messages to `tracing`
    pub log_core_messages: bool,
}

impl Default for CoreSettings {
    fn default() -> Self {
        Self {
            dependencies: Vec::new(),
            option_overrides: Vec::new(),
            preferred_input_device: None,
            system_root_path: None,
            save_root_path: None,
            log_core_messages: true,
        }
    }
}

impl CoreSettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Settings derived from a loaded [`Config`]
    pub fn from_config(config: &Config) -> Self {
        let path_string = |path: &Option<std::path::PathBuf>| {
            path.as_ref().map(|path| path.to_string_lossy().into_owned())
        };

        Self {
            dependencies: Vec::new(),
            option_overrides: config.options.overrides.clone(),
            preferred_input_device: config.input.preferred_device,
            system_root_path: path_string(&config.paths.system),
            save_root_path: path_string(&config.paths.saves),
            log_core_messages: config.debug.log_core_messages,
        }
    }

    pub fn with_dependencies(mut self, dependencies: Vec<FileDependency>) -> Self {
        self.dependencies = dependencies;
        self
    }

    pub fn with_option_override(mut self, key: impl Into<String>, index: u32) -> Self {
        self.option_overrides.push(OptionOverride::new(key, index));
        self
    }

    pub fn with_preferred_input_device(mut self, device: u32) -> Self {
        self.preferred_input_device = Some(device);
        self
    }

    pub fn with_system_root_path(mut self, path: impl Into<String>) -> Self {
        self.system_root_path = Some(path.into());
        self
    }

    pub fn with_save_root_path(mut self, path: impl Into<String>) -> Self {
        self.save_root_path = Some(path.into());
        self
    }
}

/// A loaded game. The data buffer must outlive the native session.
struct Session {
    path: CString,
    _data: Option<Vec<u8>>,
}

/// A native libretro core wrapped as a host [`Core`]
pub struct RetroCore<A: RetroApi> {
    native: NativeCore<A>,
    shared: Arc<Shared>,
    name: String,
    version: String,
    extensions: Vec<String>,
    native_archive_support: bool,
    requires_full_path: bool,
    dependencies: Vec<FileDependency>,
    initialized: bool,
    session: Option<Session>,
}

impl<A: RetroApi> RetroCore<A> {
    /// Query the core's identity and register the frontend callbacks.
    /// The native side is initialized lazily by the first game load.
    pub fn new(api: A, settings: CoreSettings) -> Result<Self> {
        let native = NativeCore::new(api);
        let shared = Arc::new(Shared::new(
            settings.option_overrides,
            settings.preferred_input_device,
            settings.log_core_messages,
        ));

        let (system_info, api_version) = {
            let _scope = CallScope::enter(&shared);
            (native.system_info()?, native.api_version())
        };
        if api_version != RETRO_API_VERSION {
            warn!(
                "Core {} reports API version {}, expected {}",
                system_info.name, api_version, RETRO_API_VERSION
            );
        }

        let mut core = Self {
            native,
            shared,
            name: system_info.name,
            version: system_info.version,
            extensions: system_info
                .extensions
                .iter()
                .map(|ext| format!(".{}", ext))
                .collect(),
            native_archive_support: system_info.block_extract,
            requires_full_path: system_info.need_fullpath,
            dependencies: settings.dependencies,
            initialized: false,
            session: None,
        };

        core.set_system_root_path(settings.system_root_path.as_deref());
        core.set_save_root_path(settings.save_root_path.as_deref());
        core.call(|native| native.install_callbacks(&CALLBACKS));

        info!(
            "Core {} {} ready ({} extensions)",
            core.name,
            core.version,
            core.extensions.len()
        );
        Ok(core)
    }

    /// Run a native call with this adapter as the callback target
    fn call<R>(&self, call: impl FnOnce(&NativeCore<A>) -> R) -> R {
        let _scope = CallScope::enter(&self.shared);
        call(&self.native)
    }

    /// The wrapped entry points
    pub fn api(&self) -> &A {
        self.native.api()
    }

    pub fn requires_full_path(&self) -> bool {
        self.requires_full_path
    }

    /// Controller descriptions announced so far, per port
    pub fn controller_devices(&self) -> Vec<Vec<ControllerDescription>> {
        self.shared.ports.declared()
    }

    pub fn display_state(&self) -> DisplayState {
        self.shared.display()
    }

    fn read_game(&self, path: &str) -> Option<Vec<u8>> {
        let file_system = self.shared.file_system();
        let mut stream = match file_system.open(Path::new(path), FileAccess::READ) {
            Ok(stream) => stream,
            Err(err) => {
                warn!("Cannot open {}: {}", path, err);
                return None;
            }
        };

        let mut data = Vec::new();
        let result = stream.read_to_end(&mut data);
        file_system.close(stream);

        match result {
            Ok(len) => {
                debug!("Read {} bytes from {}", len, path);
                Some(data)
            }
            Err(err) => {
                warn!("Cannot read {}: {}", path, err);
                None
            }
        }
    }

    fn unload_session(&mut self) {
        if let Some(session) = self.session.take() {
            self.call(|native| native.unload_game());
            info!("Unloaded {}", session.path.to_string_lossy());
        }
    }
}

impl<A: RetroApi> Core for RetroCore<A> {
    fn name(&self) -> &str {
        &self.name
    }

    fn version(&self) -> &str {
        &self.version
    }

    fn supported_extensions(&self) -> &[String] {
        &self.extensions
    }

    fn native_archive_support(&self) -> bool {
        self.native_archive_support
    }

    fn system_root_path(&self) -> Option<String> {
        self.shared.slots.lock().system_dir.as_str().map(str::to_string)
    }

    fn set_system_root_path(&mut self, path: Option<&str>) {
        if let Err(err) = self.shared.slots.lock().system_dir.set(path) {
            warn!("System root path rejected: {}", err);
        }
    }

    fn save_root_path(&self) -> Option<String> {
        self.shared.slots.lock().save_dir.as_str().map(str::to_string)
    }

    fn set_save_root_path(&mut self, path: Option<&str>) {
        if let Err(err) = self.shared.slots.lock().save_dir.set(path) {
            warn!("Save root path rejected: {}", err);
        }
    }

    fn options(&self) -> Arc<CoreOptions> {
        self.shared.options.snapshot()
    }

    fn file_dependencies(&self) -> &[FileDependency] {
        &self.dependencies
    }

    fn pixel_format(&self) -> PixelFormat {
        self.shared.display().pixel_format
    }

    fn geometry(&self) -> GameGeometry {
        self.shared.display().geometry
    }

    fn timings(&self) -> SystemTimings {
        self.shared.display().timings
    }

    fn rotation(&self) -> Rotation {
        self.shared.display().rotation
    }

    fn state(&self) -> LifecycleState {
        match (self.initialized, self.session.is_some()) {
            (_, true) => LifecycleState::GameLoaded,
            (true, false) => LifecycleState::Initialized,
            (false, false) => LifecycleState::Uninitialized,
        }
    }

    fn events(&self) -> &CoreEvents {
        &self.shared.events
    }

    fn set_file_system(&mut self, file_system: Arc<dyn HostFileSystem>) {
        self.shared.set_file_system(file_system);
    }

    fn load_game(&mut self, path: &str) -> bool {
        if !self.initialized {
            self.call(|native| native.init());
            self.initialized = true;
            debug!("Core {} initialized", self.name);
        }

        self.unload_session();

        let native_path = match CString::new(path) {
            Ok(native_path) => native_path,
            Err(_) => {
                warn!("Game path contains a NUL byte: {:?}", path);
                return false;
            }
        };

        let data = if self.requires_full_path {
            None
        } else {
            match self.read_game(path) {
                Some(data) => Some(data),
                None => return false,
            }
        };

        self.shared.set_rotation(Rotation::None);

        let loaded = self.call(|native| native.load_game(&native_path, data.as_deref()));
        if !loaded {
            warn!("Core {} rejected {}", self.name, path);
            return false;
        }

        let (geometry, timings) = self.call(|native| native.system_av_info());
        self.shared.set_geometry(geometry);
        self.shared.set_timings(timings);

        let selection = self.shared.ports.selection().to_vec();
        self.call(|native| {
            for (port, device) in selection.iter().enumerate() {
                native.set_controller_port_device(port as u32, *device);
            }
        });
        debug!("Controller devices per port: {:?}", selection);

        self.session = Some(Session {
            path: native_path,
            _data: data,
        });
        info!("Loaded {}", path);
        self.session.is_some()
    }

    fn unload_game(&mut self) {
        self.unload_session();

        if self.initialized {
            self.call(|native| native.deinit());
            self.initialized = false;
            debug!("Core {} deinitialized", self.name);
        }
    }

    fn run_frame(&mut self) {
        self.call(|native| native.run());
    }

    fn reset(&mut self) {
        self.call(|native| native.reset());
    }

    fn serialization_size(&mut self) -> u64 {
        self.call(|native| native.serialize_size()) as u64
    }

    fn save_state(&mut self, output: &mut dyn FileStream) -> bool {
        let size = self.call(|native| native.serialize_size());
        let mut buffer = vec![0u8; size];
        if !self.call(|native| native.serialize(&mut buffer)) {
            debug!("Core {} could not serialize {} bytes", self.name, size);
            return false;
        }

        let written = output
            .seek(SeekFrom::Start(0))
            .and_then(|_| output.write_all(&buffer))
            .and_then(|_| output.set_length(size as u64));
        match written {
            Ok(()) => true,
            Err(err) => {
                warn!("Cannot write save state: {}", err);
                false
            }
        }
    }

    fn load_state(&mut self, input: &mut dyn FileStream) -> bool {
        let mut buffer = Vec::new();
        if let Err(err) = input
            .seek(SeekFrom::Start(0))
            .and_then(|_| input.read_to_end(&mut buffer))
        {
            warn!("Cannot read save state: {}", err);
            return false;
        }
        self.call(|native| native.unserialize(&buffer))
    }
}

impl<A: RetroApi> Drop for RetroCore<A> {
    fn drop(&mut self) {
        if self.initialized || self.session.is_some() {
            self.unload_game();
        }
        self.shared.slots.lock().release_all();
    }
}
