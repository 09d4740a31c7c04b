//! Input device ids and control identities
//!
//! Cores query input as a `(device, index, id)` triple. The host sees a
//! flat [`InputType`] instead.

/// Native device ids
pub mod device {
    pub const NONE: u32 = 0;
    pub const JOYPAD: u32 = 1;
    pub const MOUSE: u32 = 2;
    pub const KEYBOARD: u32 = 3;
    pub const LIGHTGUN: u32 = 4;
    pub const ANALOG: u32 = 5;
    pub const POINTER: u32 = 6;

    /// Bits of a device id that hold the base device
    pub const TYPE_SHIFT: u32 = 8;
    pub const MASK: u32 = (1 << TYPE_SHIFT) - 1;

    /// Build a core-specific specialisation of a base device
    pub const fn subclass(base: u32, id: u32) -> u32 {
        ((id + 1) << TYPE_SHIFT) | base
    }

    /// Strip any subclass bits
    pub const fn base(device: u32) -> u32 {
        device & MASK
    }
}

/// Analog stick indices
mod analog {
    pub const INDEX_LEFT: u32 = 0;
    pub const INDEX_RIGHT: u32 = 1;
    pub const ID_X: u32 = 0;
    pub const ID_Y: u32 = 1;
}

/// A single control the host can report state for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputType {
    JoypadB,
    JoypadY,
    JoypadSelect,
    JoypadStart,
    JoypadUp,
    JoypadDown,
    JoypadLeft,
    JoypadRight,
    JoypadA,
    JoypadX,
    JoypadL,
    JoypadR,
    JoypadL2,
    JoypadR2,
    JoypadL3,
    JoypadR3,
    AnalogLeftX,
    AnalogLeftY,
    AnalogRightX,
    AnalogRightY,
    MouseX,
    MouseY,
    MouseLeft,
    MouseRight,
    MouseWheelUp,
    MouseWheelDown,
    MouseMiddle,
    PointerX,
    PointerY,
    PointerPressed,
}

const JOYPAD_BUTTONS: [InputType; 16] = [
    InputType::JoypadB,
    InputType::JoypadY,
    InputType::JoypadSelect,
    InputType::JoypadStart,
    InputType::JoypadUp,
    InputType::JoypadDown,
    InputType::JoypadLeft,
    InputType::JoypadRight,
    InputType::JoypadA,
    InputType::JoypadX,
    InputType::JoypadL,
    InputType::JoypadR,
    InputType::JoypadL2,
    InputType::JoypadR2,
    InputType::JoypadL3,
    InputType::JoypadR3,
];

const MOUSE_CONTROLS: [InputType; 7] = [
    InputType::MouseX,
    InputType::MouseY,
    InputType::MouseLeft,
    InputType::MouseRight,
    InputType::MouseWheelUp,
    InputType::MouseWheelDown,
    InputType::MouseMiddle,
];

const POINTER_CONTROLS: [InputType; 3] = [
    InputType::PointerX,
    InputType::PointerY,
    InputType::PointerPressed,
];

impl InputType {
    /// Convert a native state query. Subclassed devices resolve to their base.
    pub fn from_native(device_id: u32, index: u32, id: u32) -> Option<Self> {
        match device::base(device_id) {
            device::JOYPAD => JOYPAD_BUTTONS.get(id as usize).copied(),
            device::ANALOG => match (index, id) {
                (analog::INDEX_LEFT, analog::ID_X) => Some(Self::AnalogLeftX),
                (analog::INDEX_LEFT, analog::ID_Y) => Some(Self::AnalogLeftY),
                (analog::INDEX_RIGHT, analog::ID_X) => Some(Self::AnalogRightX),
                (analog::INDEX_RIGHT, analog::ID_Y) => Some(Self::AnalogRightY),
                _ => None,
            },
            device::MOUSE => MOUSE_CONTROLS.get(id as usize).copied(),
            device::POINTER => POINTER_CONTROLS.get(id as usize).copied(),
            _ => None,
        }
    }
}
