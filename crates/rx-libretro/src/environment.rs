//! Environment command dispatcher
//!
//! Answers the core's `retro_environment_t` calls. The set of handled
//! commands is closed; anything else is reported as unhandled.

use crate::callbacks;
use crate::state::Shared;
use crate::vfs;
use rx_core::{PixelFormat, Rotation};
use rx_ffi::abi::{env, RetroLogCallback};
use rx_ffi::EnvPayload;
use tracing::{debug, trace, warn};

/// Human-readable command name for traces
fn command_name(command: u32) -> &'static str {
    match command {
        env::SET_ROTATION => "SET_ROTATION",
        env::GET_OVERSCAN => "GET_OVERSCAN",
        env::GET_CAN_DUPE => "GET_CAN_DUPE",
        env::GET_SYSTEM_DIRECTORY => "GET_SYSTEM_DIRECTORY",
        env::SET_PIXEL_FORMAT => "SET_PIXEL_FORMAT",
        env::GET_VARIABLE => "GET_VARIABLE",
        env::SET_VARIABLES => "SET_VARIABLES",
        env::GET_LOG_INTERFACE => "GET_LOG_INTERFACE",
        env::GET_SAVE_DIRECTORY => "GET_SAVE_DIRECTORY",
        env::SET_SYSTEM_AV_INFO => "SET_SYSTEM_AV_INFO",
        env::SET_CONTROLLER_INFO => "SET_CONTROLLER_INFO",
        env::SET_GEOMETRY => "SET_GEOMETRY",
        env::GET_VFS_INTERFACE => "GET_VFS_INTERFACE",
        _ => "unknown",
    }
}

fn is_handled(command: u32) -> bool {
    command_name(command) != "unknown"
}

/// Handle one environment command. Returns whether it was handled (or,
/// for `GET_VARIABLE`, whether the key was found).
pub(crate) fn dispatch(shared: &Shared, command: u32, payload: Option<EnvPayload>) -> bool {
    if !is_handled(command) {
        debug!("Unhandled environment command {:#x}", command);
        return false;
    }
    trace!("Environment command {} ({:#x})", command_name(command), command);

    let Some(mut payload) = payload else {
        warn!("Environment command {} without payload", command_name(command));
        return false;
    };

    match command {
        env::SET_ROTATION => {
            let raw = payload.read_u32();
            match Rotation::from_raw(raw) {
                Some(rotation) => shared.set_rotation(rotation),
                None => warn!("Ignoring unknown rotation {}", raw),
            }
            true
        }
        env::GET_OVERSCAN => {
            payload.write_bool(false);
            true
        }
        env::GET_CAN_DUPE => {
            payload.write_bool(true);
            true
        }
        env::GET_SYSTEM_DIRECTORY => {
            payload.write_str_ptr(shared.slots.lock().system_dir.as_ptr());
            true
        }
        env::GET_SAVE_DIRECTORY => {
            payload.write_str_ptr(shared.slots.lock().save_dir.as_ptr());
            true
        }
        env::SET_PIXEL_FORMAT => {
            let raw = payload.read_u32();
            match PixelFormat::from_raw(raw) {
                Some(format) => shared.set_pixel_format(format),
                None => warn!("Ignoring unknown pixel format {}", raw),
            }
            true
        }
        env::GET_VARIABLE => get_variable(shared, &mut payload),
        env::SET_VARIABLES => {
            shared.options.declare(&payload.read_variables());
            true
        }
        env::GET_LOG_INTERFACE => {
            payload.write_log_callback(RetroLogCallback {
                log: callbacks::log_message,
            });
            true
        }
        env::SET_SYSTEM_AV_INFO => {
            let (geometry, timings) = payload.read_av_info();
            shared.set_geometry(geometry);
            shared.set_timings(timings);
            true
        }
        env::SET_CONTROLLER_INFO => {
            shared.ports.declare(payload.read_controller_info());
            true
        }
        env::SET_GEOMETRY => {
            shared.set_geometry(payload.read_geometry());
            true
        }
        env::GET_VFS_INTERFACE => {
            vfs::negotiate(shared, &mut payload);
            true
        }
        _ => false,
    }
}

/// Resolve a variable into the shared value slot. The pointer written back
/// stays valid until the next lookup.
fn get_variable(shared: &Shared, payload: &mut EnvPayload) -> bool {
    let value = payload
        .variable_key()
        .and_then(|key| shared.options.selected_value(&key));

    let mut slots = shared.slots.lock();
    let stored = match value.as_deref().map(|value| slots.resolved_value.set(Some(value))) {
        Some(Ok(())) => true,
        Some(Err(err)) => {
            warn!("Cannot expose option value: {}", err);
            false
        }
        None => false,
    };

    if stored {
        payload.set_variable_value(slots.resolved_value.as_ptr());
    } else {
        payload.set_variable_value(std::ptr::null());
    }
    stored
}
