//! libretro core adapter
//!
//! Wraps a native libretro core behind the host-facing [`rx_core::Core`]
//! trait: environment command handling, option bookkeeping, frame and
//! input delivery, save states and the VFS interface.

mod adapter;
mod bridge;
mod callbacks;
mod context;
mod environment;
mod options;
mod ports;
mod state;
mod vfs;

pub use adapter::{CoreSettings, RetroCore};
pub use state::DisplayState;
pub use vfs::SUPPORTED_VFS_VERSION;
