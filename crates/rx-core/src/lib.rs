//! Core types for the retrix libretro adapter
//!
//! This crate provides the host-facing types, the [`Core`] trait, error
//! handling, configuration, and logging infrastructure.

pub mod config;
pub mod core;
pub mod error;
pub mod events;
pub mod input;
pub mod logging;
pub mod stream;
pub mod types;

pub use config::{Config, LogLevel, OptionOverride};
pub use self::core::{Core, CoreOptions, LifecycleState};
pub use error::{Result, RetroError};
pub use events::{CoreEvents, SubscriptionId};
pub use input::InputType;
pub use stream::{FileAccess, FileStream, HostFileSystem, NativeFileSystem};
pub use types::{
    ControllerDescription, CoreOption, FileDependency, GameGeometry, PixelFormat, Rotation,
    SystemTimings, VideoFrame,
};
