use foundation::ids::TextureId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColorSpace {
    Srgb,
    Linear,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Filter {
    Linear,
    /// Trilinear: linear within and between mip levels.
    LinearMipmapLinear,
}

/// Sampling state applied once, when a texture becomes ready.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sampling {
    pub color_space: ColorSpace,
    pub min_filter: Filter,
    pub mag_filter: Filter,
    pub mipmaps: bool,
    pub anisotropy: u8,
}

impl Sampling {
    /// Mobile GPUs skip mipmaps and anisotropic filtering.
    pub fn for_device(mobile: bool) -> Self {
        if mobile {
            Self {
                color_space: ColorSpace::Srgb,
                min_filter: Filter::Linear,
                mag_filter: Filter::Linear,
                mipmaps: false,
                anisotropy: 1,
            }
        } else {
            Self {
                color_space: ColorSpace::Srgb,
                min_filter: Filter::LinearMipmapLinear,
                mag_filter: Filter::Linear,
                mipmaps: true,
                anisotropy: 4,
            }
        }
    }
}

/// A decoded bitmap as reported by the loading backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
}

/// A GPU-resident texture owned by the stream.
#[derive(Debug, Clone, PartialEq)]
pub struct Texture {
    pub id: TextureId,
    pub url: String,
    pub width: u32,
    pub height: u32,
    pub sampling: Sampling,
}

impl Texture {
    pub fn aspect(&self) -> f64 {
        if self.height == 0 {
            return 1.0;
        }
        self.width as f64 / self.height as f64
    }
}
