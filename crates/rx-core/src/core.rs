//! Host-facing interface implemented by every core adapter

use crate::events::CoreEvents;
use crate::stream::{FileStream, HostFileSystem};
use crate::types::{CoreOption, FileDependency, GameGeometry, PixelFormat, Rotation, SystemTimings};
use std::collections::HashMap;
use std::sync::Arc;

/// Option set as declared by the core, keyed by option key
pub type CoreOptions = HashMap<String, CoreOption>;

/// Lifecycle of a core adapter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    /// Native side not initialized
    Uninitialized,
    /// Native side initialized, no game
    Initialized,
    /// A game is loaded
    GameLoaded,
}

/// A loaded emulator core
///
/// Operations return `bool` the way the native interface does. A `false`
/// result is never fatal; the host decides whether to retry.
pub trait Core {
    fn name(&self) -> &str;
    fn version(&self) -> &str;
    /// Extensions including the leading dot, e.g. `".cue"`
    fn supported_extensions(&self) -> &[String];
    /// Whether the core opens archives itself
    fn native_archive_support(&self) -> bool;

    fn system_root_path(&self) -> Option<String>;
    fn set_system_root_path(&mut self, path: Option<&str>);
    fn save_root_path(&self) -> Option<String>;
    fn set_save_root_path(&mut self, path: Option<&str>);

    /// Snapshot of the most recently declared options
    fn options(&self) -> Arc<CoreOptions>;
    fn file_dependencies(&self) -> &[FileDependency];

    fn pixel_format(&self) -> PixelFormat;
    fn geometry(&self) -> GameGeometry;
    fn timings(&self) -> SystemTimings;
    fn rotation(&self) -> Rotation;
    fn state(&self) -> LifecycleState;

    /// Notification and input registry
    fn events(&self) -> &CoreEvents;
    fn set_file_system(&mut self, file_system: Arc<dyn HostFileSystem>);

    fn load_game(&mut self, path: &str) -> bool;
    fn unload_game(&mut self);
    fn run_frame(&mut self);
    fn reset(&mut self);

    /// Size of a save state, queried from the core every time
    fn serialization_size(&mut self) -> u64;
    fn save_state(&mut self, output: &mut dyn FileStream) -> bool;
    fn load_state(&mut self, input: &mut dyn FileStream) -> bool;
}
