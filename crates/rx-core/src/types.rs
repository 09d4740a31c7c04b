//! Host-facing value types shared by every adapter

/// Framebuffer pixel layout announced by the core
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u32)]
pub enum PixelFormat {
    /// 0RGB1555, native endian. The libretro default.
    #[default]
    Xrgb1555 = 0,
    /// XRGB8888, native endian
    Xrgb8888 = 1,
    /// RGB565, native endian
    Rgb565 = 2,
}

impl PixelFormat {
    /// Convert from the native enumerant
    pub fn from_raw(value: u32) -> Option<Self> {
        match value {
            0 => Some(Self::Xrgb1555),
            1 => Some(Self::Xrgb8888),
            2 => Some(Self::Rgb565),
            _ => None,
        }
    }

    /// Bytes per pixel
    pub fn bytes_per_pixel(&self) -> usize {
        match self {
            Self::Xrgb1555 | Self::Rgb565 => 2,
            Self::Xrgb8888 => 4,
        }
    }
}

/// Screen rotation, counter-clockwise
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u32)]
pub enum Rotation {
    #[default]
    None = 0,
    Ccw90 = 1,
    Ccw180 = 2,
    Ccw270 = 3,
}

impl Rotation {
    /// Convert from the native enumerant
    pub fn from_raw(value: u32) -> Option<Self> {
        match value {
            0 => Some(Self::None),
            1 => Some(Self::Ccw90),
            2 => Some(Self::Ccw180),
            3 => Some(Self::Ccw270),
            _ => None,
        }
    }

    /// Rotation in degrees
    pub fn degrees(&self) -> u32 {
        *self as u32 * 90
    }
}

/// Frame geometry
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GameGeometry {
    pub base_width: u32,
    pub base_height: u32,
    pub max_width: u32,
    pub max_height: u32,
    /// Display aspect ratio. Zero or less means `base_width / base_height`.
    pub aspect_ratio: f32,
}

impl GameGeometry {
    /// Aspect ratio to present with, falling back to the pixel ratio
    pub fn effective_aspect_ratio(&self) -> f32 {
        if self.aspect_ratio > 0.0 || self.base_height == 0 {
            self.aspect_ratio
        } else {
            self.base_width as f32 / self.base_height as f32
        }
    }
}

/// Video and audio timing
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SystemTimings {
    pub fps: f64,
    pub sample_rate: f64,
}

/// Auxiliary file (usually a BIOS image) a core needs in its system directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDependency {
    pub name: String,
    pub description: String,
    /// Lowercase hex MD5 of the expected file
    pub md5: String,
}

impl FileDependency {
    pub fn new(name: impl Into<String>, description: impl Into<String>, md5: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            md5: md5.into(),
        }
    }
}

/// One controller type a core accepts on a port
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerDescription {
    pub description: String,
    /// Native device id, possibly a subclass of a base device
    pub id: u32,
}

/// A core option as declared by the core
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreOption {
    pub description: String,
    pub values: Vec<String>,
    pub selected_index: u32,
}

impl CoreOption {
    pub fn new(description: impl Into<String>, values: Vec<String>) -> Self {
        Self {
            description: description.into(),
            values,
            selected_index: 0,
        }
    }

    /// Currently selected value
    pub fn selected_value(&self) -> Option<&str> {
        self.values
            .get(self.selected_index as usize)
            .map(String::as_str)
    }
}

/// Video frame handed to observers for the duration of one callback.
///
/// `data` borrows the core's framebuffer. Observers that need pixels after
/// returning must copy them out.
#[derive(Debug, Clone, Copy)]
pub struct VideoFrame<'a> {
    /// `None` when the core asks to repeat the previous frame
    pub data: Option<&'a [u8]>,
    pub width: u32,
    pub height: u32,
    /// Bytes between the start of consecutive rows
    pub pitch: u32,
}

impl<'a> VideoFrame<'a> {
    /// Whether this frame repeats the previous one
    pub fn is_dupe(&self) -> bool {
        self.data.is_none()
    }

    /// Visible bytes of row `y`, excluding pitch padding
    pub fn row(&self, y: u32, format: PixelFormat) -> Option<&'a [u8]> {
        let data = self.data?;
        if y >= self.height {
            return None;
        }
        let start = y as usize * self.pitch as usize;
        let len = self.width as usize * format.bytes_per_pixel();
        data.get(start..start + len)
    }

    /// Copy the visible pixels into a tightly packed buffer
    pub fn to_packed(&self, format: PixelFormat) -> Option<Vec<u8>> {
        self.data?;
        let row_len = self.width as usize * format.bytes_per_pixel();
        let mut packed = Vec::with_capacity(row_len * self.height as usize);
        for y in 0..self.height {
            packed.extend_from_slice(self.row(y, format)?);
        }
        Some(packed)
    }

    /// Copy row `y` out as 16-bit pixels (0RGB1555 and RGB565)
    pub fn row_u16(&self, y: u32, format: PixelFormat) -> Option<Vec<u16>> {
        if format.bytes_per_pixel() != 2 {
            return None;
        }
        Some(bytemuck::pod_collect_to_vec(self.row(y, format)?))
    }

    /// Copy row `y` out as 32-bit pixels (XRGB8888)
    pub fn row_u32(&self, y: u32, format: PixelFormat) -> Option<Vec<u32>> {
        if format.bytes_per_pixel() != 4 {
            return None;
        }
        Some(bytemuck::pod_collect_to_vec(self.row(y, format)?))
    }
}
