//! Owned native string slots
//!
//! Strings the core reads through a raw `const char *` must stay alive
//! until the frontend replaces them. Each such string lives in exactly one
//! [`NativeSlot`].

use rx_core::RetroError;
use std::ffi::{c_char, CString};

/// One NUL-terminated string visible to native code
#[derive(Debug, Default)]
pub struct NativeSlot {
    value: Option<CString>,
}

impl NativeSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the slot contents. The previous allocation is freed before
    /// the new one is made. A value with an interior NUL leaves the slot
    /// empty.
    pub fn set(&mut self, value: Option<&str>) -> Result<(), RetroError> {
        self.value = None;
        if let Some(value) = value {
            let owned = CString::new(value).map_err(|_| RetroError::InvalidString(value.to_string()))?;
            self.value = Some(owned);
        }
        Ok(())
    }

    /// Address handed to native code, null when empty
    pub fn as_ptr(&self) -> *const c_char {
        self.value.as_ref().map_or(std::ptr::null(), |value| value.as_ptr())
    }

    pub fn as_str(&self) -> Option<&str> {
        self.value.as_ref().and_then(|value| value.to_str().ok())
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_none()
    }

    /// Free the allocation now
    pub fn release(&mut self) {
        self.value = None;
    }
}

/// Every string slot an adapter owns
#[derive(Debug, Default)]
pub struct RootSlots {
    pub system_dir: NativeSlot,
    pub save_dir: NativeSlot,
    /// Value returned by the last successful variable lookup
    pub resolved_value: NativeSlot,
}

impl RootSlots {
    pub fn release_all(&mut self) {
        self.system_dir.release();
        self.save_dir.release();
        self.resolved_value.release();
    }
}
