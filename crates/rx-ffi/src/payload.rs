//! Typed access to environment command payloads
//!
//! Each environment command carries one `void *` whose layout depends on the
//! command id. [`EnvPayload`] reads and writes that memory according to the
//! layouts in [`crate::abi`], so the dispatcher never handles raw addresses.

use crate::abi::*;
use crate::native::string_from_ptr;
use bytemuck::Pod;
use rx_core::{ControllerDescription, GameGeometry, SystemTimings};
use std::ffi::{c_char, c_void};
use std::mem::{offset_of, size_of};
use std::ptr::NonNull;

/// Payload of one environment call
#[derive(Debug)]
pub struct EnvPayload {
    ptr: NonNull<c_void>,
}

impl EnvPayload {
    /// Wrap a payload pointer. Returns `None` for null.
    ///
    /// # Safety
    /// `ptr` must point to memory laid out as the command being dispatched
    /// expects, valid for reads and writes until the payload is dropped.
    pub unsafe fn new(ptr: *mut c_void) -> Option<Self> {
        NonNull::new(ptr).map(|ptr| Self { ptr })
    }

    fn read_pod_at<T: Pod>(&self, offset: usize) -> T {
        let bytes = unsafe {
            std::slice::from_raw_parts((self.ptr.as_ptr() as *const u8).add(offset), size_of::<T>())
        };
        bytemuck::pod_read_unaligned(bytes)
    }

    fn write_pod<T: Pod>(&mut self, value: T) {
        let bytes = bytemuck::bytes_of(&value);
        unsafe {
            std::ptr::copy_nonoverlapping(bytes.as_ptr(), self.ptr.as_ptr() as *mut u8, bytes.len());
        }
    }

    /// Read a 4-byte enumerant
    pub fn read_u32(&self) -> u32 {
        self.read_pod_at(0)
    }

    /// Write a C `bool`
    pub fn write_bool(&mut self, value: bool) {
        self.write_pod(value as u8);
    }

    /// Write a string pointer (may be null)
    pub fn write_str_ptr(&mut self, value: *const c_char) {
        unsafe { (self.ptr.as_ptr() as *mut *const c_char).write_unaligned(value) }
    }

    /// Write a `retro_log_callback`
    pub fn write_log_callback(&mut self, callback: RetroLogCallback) {
        unsafe { (self.ptr.as_ptr() as *mut RetroLogCallback).write_unaligned(callback) }
    }

    /// Read a `retro_game_geometry`
    pub fn read_geometry(&self) -> GameGeometry {
        self.read_pod_at::<RetroGameGeometry>(0).into()
    }

    /// Read a `retro_system_av_info`
    pub fn read_av_info(&self) -> (GameGeometry, SystemTimings) {
        let geometry = self.read_pod_at::<RetroGameGeometry>(offset_of!(RetroSystemAvInfo, geometry));
        let timing = self.read_pod_at::<RetroSystemTiming>(offset_of!(RetroSystemAvInfo, timing));
        (geometry.into(), timing.into())
    }

    /// Read a null-key terminated `retro_variable` array as `(key, value)` pairs.
    /// Entries with a null value are skipped.
    pub fn read_variables(&self) -> Vec<(String, String)> {
        let mut entries = Vec::new();
        let mut cursor = self.ptr.as_ptr() as *const RetroVariable;
        loop {
            let variable = unsafe { cursor.read_unaligned() };
            if variable.key.is_null() {
                break;
            }
            let key = unsafe { string_from_ptr(variable.key) }.unwrap_or_default();
            match unsafe { string_from_ptr(variable.value) } {
                Some(value) => entries.push((key, value)),
                None => tracing::warn!("Variable {} declared without a value", key),
            }
            cursor = unsafe { cursor.add(1) };
        }
        entries
    }

    /// Key of a single `retro_variable`
    pub fn variable_key(&self) -> Option<String> {
        let variable = unsafe { (self.ptr.as_ptr() as *const RetroVariable).read_unaligned() };
        unsafe { string_from_ptr(variable.key) }
    }

    /// Set the value field of a single `retro_variable`
    pub fn set_variable_value(&mut self, value: *const c_char) {
        let field = unsafe {
            (self.ptr.as_ptr() as *mut u8).add(offset_of!(RetroVariable, value)) as *mut *const c_char
        };
        unsafe { field.write_unaligned(value) }
    }

    /// Walk a `retro_controller_info` array. The outer pointer only advances
    /// past records with a non-null `types`; the first null `types` ends
    /// the array.
    pub fn read_controller_info(&self) -> Vec<Vec<ControllerDescription>> {
        let mut ports = Vec::new();
        let mut cursor = self.ptr.as_ptr() as *const RetroControllerInfo;
        loop {
            let info = unsafe { cursor.read_unaligned() };
            if info.types.is_null() {
                break;
            }

            let descriptions = (0..info.num_types as usize)
                .map(|i| {
                    let raw = unsafe { info.types.add(i).read_unaligned() };
                    ControllerDescription {
                        description: unsafe { string_from_ptr(raw.desc) }.unwrap_or_default(),
                        id: raw.id,
                    }
                })
                .collect();
            ports.push(descriptions);

            cursor = unsafe { cursor.add(1) };
        }
        ports
    }

    /// Interface version the core asks for in `retro_vfs_interface_info`
    pub fn vfs_required_version(&self) -> u32 {
        self.read_pod_at(offset_of!(RetroVfsInterfaceInfo, required_interface_version))
    }

    /// Answer a VFS request with `version` and `iface`
    pub fn write_vfs_interface(&mut self, version: u32, iface: *const RetroVfsInterface) {
        let info = RetroVfsInterfaceInfo {
            required_interface_version: version,
            iface: iface as *mut RetroVfsInterface,
        };
        unsafe { (self.ptr.as_ptr() as *mut RetroVfsInterfaceInfo).write_unaligned(info) }
    }
}
