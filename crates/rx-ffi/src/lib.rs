//! FFI boundary for libretro cores
//!
//! Native layouts, the raw entry-point table and the only code that reads
//! or writes memory owned by a core.

pub mod abi;
pub mod api;
pub mod native;
pub mod payload;
pub mod slot;
pub mod view;

pub use abi::CallbackTable;
pub use api::{CoreSymbols, RetroApi};
pub use native::{NativeCore, SystemInfo};
pub use payload::EnvPayload;
pub use slot::{NativeSlot, RootSlots};
pub use view::{audio_samples, frame_bytes};
