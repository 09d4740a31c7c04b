//! State shared between the adapter and its native callbacks

use crate::options::OptionRegistry;
use crate::ports::ControllerPorts;
use parking_lot::{Mutex, RwLock};
use rx_core::{
    CoreEvents, GameGeometry, HostFileSystem, NativeFileSystem, OptionOverride, PixelFormat,
    Rotation, SystemTimings,
};
use rx_ffi::RootSlots;
use std::sync::Arc;

/// Display parameters announced by the core
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DisplayState {
    pub pixel_format: PixelFormat,
    pub geometry: GameGeometry,
    pub timings: SystemTimings,
    pub rotation: Rotation,
}

/// Everything a callback may touch. Locks are never held while calling
/// into the core or into host observers.
pub(crate) struct Shared {
    pub options: OptionRegistry,
    pub slots: Mutex<RootSlots>,
    pub display: Mutex<DisplayState>,
    pub ports: ControllerPorts,
    pub events: CoreEvents,
    file_system: RwLock<Arc<dyn HostFileSystem>>,
    pub log_core_messages: bool,
}

impl Shared {
    pub fn new(
        overrides: Vec<OptionOverride>,
        preferred_device: Option<u32>,
        log_core_messages: bool,
    ) -> Self {
        Self {
            options: OptionRegistry::new(overrides),
            slots: Mutex::new(RootSlots::default()),
            display: Mutex::new(DisplayState::default()),
            ports: ControllerPorts::new(preferred_device),
            events: CoreEvents::new(),
            file_system: RwLock::new(Arc::new(NativeFileSystem)),
            log_core_messages,
        }
    }

    pub fn display(&self) -> DisplayState {
        *self.display.lock()
    }

    pub fn set_pixel_format(&self, format: PixelFormat) {
        self.display.lock().pixel_format = format;
        tracing::debug!("Pixel format changed to {:?}", format);
        self.events.emit_pixel_format(format);
    }

    pub fn set_geometry(&self, geometry: GameGeometry) {
        self.display.lock().geometry = geometry;
        tracing::debug!(
            "Geometry changed to {}x{} (max {}x{})",
            geometry.base_width,
            geometry.base_height,
            geometry.max_width,
            geometry.max_height
        );
        self.events.emit_geometry(geometry);
    }

    pub fn set_timings(&self, timings: SystemTimings) {
        self.display.lock().timings = timings;
        tracing::debug!("Timings changed to {} fps, {} Hz", timings.fps, timings.sample_rate);
        self.events.emit_timings(timings);
    }

    pub fn set_rotation(&self, rotation: Rotation) {
        self.display.lock().rotation = rotation;
        self.events.emit_rotation(rotation);
    }

    pub fn file_system(&self) -> Arc<dyn HostFileSystem> {
        Arc::clone(&self.file_system.read())
    }

    pub fn set_file_system(&self, file_system: Arc<dyn HostFileSystem>) {
        *self.file_system.write() = file_system;
    }
}
