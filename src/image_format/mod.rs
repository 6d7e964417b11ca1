// Copyright 2018 Osspial
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Texel formats and the size rules that go with them.
//!
//! There are two broad classes of image formats: compressed formats and uncompressed formats.
//!
//! *Uncompressed formats* store every texel individually. Most of them describe one primitive per
//! color channel, and accept any [`DataType`] for that primitive. *Packed* formats squeeze every
//! channel into a single primitive (e.g. `Rgba4444` stores a whole texel in one `u16`), so they
//! only accept the one primitive type they were designed around.
//!
//! *Compressed formats* store 4x4 blocks of texels in a fixed number of bytes. They can't be
//! addressed per texel, and always take byte data. See the [`compressed`](./compressed/index.html)
//! module.
//!
//! [`DataType`]: ../buffer/enum.DataType.html

pub mod compressed;

use self::compressed::BlockFormat;
use crate::buffer::DataType;
use cgmath::Vector3;

/// Attributes used to size and validate the client data of a format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormatAttributes {
    /// Attributes of an uncompressed image format.
    Uncompressed {
        /// The only primitive type the format accepts, or `None` if it accepts any type.
        supported_type: Option<DataType>,
        /// The number of primitives used to store one texel.
        primitives_per_texel: u32,
        /// The number of color components in each texel.
        components: u32,
        alpha: bool,
        /// Whether every component shares a single primitive.
        packed: bool,
    },
    /// Attributes of a compressed image format.
    Compressed {
        block: BlockFormat,
        components: u32,
        alpha: bool,
    },
}

/// The channel layout, packing, and compression of a texture's texels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TextureFormat {
    Rgba,
    Rgba4444,
    Rgba8888,
    Rgba5551,
    RgbaFloat,
    RgbaDxt1,
    RgbaDxt3,
    RgbaDxt5,

    Bgra,
    Bgra4444,
    Bgra8888,
    Bgra5551,

    Argb4444,
    Argb1555,
    Argb8888,

    Abgr4444,
    Abgr1555,
    Abgr8888,

    Rgb,
    Rgb565,
    RgbFloat,
    RgbDxt1,

    Bgr,
    Bgr565,

    R,
    RFloat,
    Rg,
    RgFloat,

    Depth,
    DepthFloat,
    DepthStencil,
}

macro_rules! uncompressed {
    (packed $ty:ident, $components:expr, $alpha:expr) => {
        FormatAttributes::Uncompressed {
            supported_type: Some(DataType::$ty),
            primitives_per_texel: 1,
            components: $components,
            alpha: $alpha,
            packed: true,
        }
    };
    ($ty:expr, $prims:expr, $components:expr, $alpha:expr) => {
        FormatAttributes::Uncompressed {
            supported_type: $ty,
            primitives_per_texel: $prims,
            components: $components,
            alpha: $alpha,
            packed: false,
        }
    };
}

impl TextureFormat {
    pub fn attributes(self) -> FormatAttributes {
        use self::TextureFormat::*;
        let float = Some(DataType::Float);
        match self {
            Rgba | Bgra => uncompressed!(None, 4, 4, true),
            Rgba4444 | Rgba5551 | Bgra4444 | Bgra5551 => uncompressed!(packed UnsignedShort, 4, true),
            Argb4444 | Argb1555 | Abgr4444 | Abgr1555 => uncompressed!(packed UnsignedShort, 4, true),
            Rgba8888 | Bgra8888 | Argb8888 | Abgr8888 => uncompressed!(packed UnsignedInt, 4, true),
            RgbaFloat => uncompressed!(float, 4, 4, true),
            RgbaDxt1 => FormatAttributes::Compressed {
                block: BlockFormat::Dxt1,
                components: 4,
                alpha: true,
            },
            RgbaDxt3 => FormatAttributes::Compressed {
                block: BlockFormat::Dxt3,
                components: 4,
                alpha: true,
            },
            RgbaDxt5 => FormatAttributes::Compressed {
                block: BlockFormat::Dxt5,
                components: 4,
                alpha: true,
            },

            Rgb | Bgr => uncompressed!(None, 3, 3, false),
            Rgb565 | Bgr565 => uncompressed!(packed UnsignedShort, 3, false),
            RgbFloat => uncompressed!(float, 3, 3, false),
            RgbDxt1 => FormatAttributes::Compressed {
                block: BlockFormat::Dxt1,
                components: 3,
                alpha: false,
            },

            R => uncompressed!(None, 1, 1, false),
            RFloat => uncompressed!(float, 1, 1, false),
            Rg => uncompressed!(None, 2, 2, false),
            RgFloat => uncompressed!(float, 2, 2, false),

            Depth | DepthStencil => uncompressed!(Some(DataType::UnsignedInt), 1, 1, false),
            DepthFloat => uncompressed!(float, 1, 1, false),
        }
    }

    #[inline]
    pub fn is_compressed(self) -> bool {
        match self.attributes() {
            FormatAttributes::Compressed { .. } => true,
            FormatAttributes::Uncompressed { .. } => false,
        }
    }

    #[inline]
    pub fn is_packed(self) -> bool {
        match self.attributes() {
            FormatAttributes::Uncompressed { packed, .. } => packed,
            FormatAttributes::Compressed { .. } => false,
        }
    }

    #[inline]
    pub fn is_depth(self) -> bool {
        match self {
            TextureFormat::Depth | TextureFormat::DepthFloat | TextureFormat::DepthStencil => true,
            _ => false,
        }
    }

    #[inline]
    pub fn has_alpha(self) -> bool {
        match self.attributes() {
            FormatAttributes::Uncompressed { alpha, .. } | FormatAttributes::Compressed { alpha, .. } => alpha,
        }
    }

    #[inline]
    pub fn num_components(self) -> u32 {
        match self.attributes() {
            FormatAttributes::Uncompressed { components, .. }
            | FormatAttributes::Compressed { components, .. } => components,
        }
    }

    /// The number of primitives used to store one texel, or `None` for compressed formats.
    #[inline]
    pub fn primitives_per_texel(self) -> Option<u32> {
        match self.attributes() {
            FormatAttributes::Uncompressed { primitives_per_texel, .. } => Some(primitives_per_texel),
            FormatAttributes::Compressed { .. } => None,
        }
    }

    /// The only data type the format accepts, or `None` if any type works.
    #[inline]
    pub fn supported_type(self) -> Option<DataType> {
        match self.attributes() {
            FormatAttributes::Uncompressed { supported_type, .. } => supported_type,
            FormatAttributes::Compressed { .. } => Some(DataType::UnsignedByte),
        }
    }

    #[inline]
    pub fn is_type_valid(self, data_type: DataType) -> bool {
        match self.supported_type() {
            Some(supported) => supported == data_type,
            None => true,
        }
    }

    /// The number of primitives needed to hold an image of the given dimensions.
    ///
    /// Returns `None` if any dimension is zero, if the dimensions can't be represented in this
    /// format, or if the size overflows a `usize`.
    ///
    /// ```
    /// use ferox::image_format::TextureFormat;
    ///
    /// assert_eq!(TextureFormat::Rgba.buffer_size(2, 2, 1), Some(16));
    /// assert_eq!(TextureFormat::RgbDxt1.buffer_size(8, 8, 1), Some(32));
    /// assert_eq!(TextureFormat::RgbaDxt5.buffer_size(6, 6, 1), None);
    /// ```
    pub fn buffer_size(self, width: u32, height: u32, depth: u32) -> Option<usize> {
        if width == 0 || height == 0 || depth == 0 {
            return None;
        }
        let dims = Vector3::new(width, height, depth);

        match self.attributes() {
            FormatAttributes::Uncompressed { primitives_per_texel, .. } => (width as usize)
                .checked_mul(height as usize)?
                .checked_mul(depth as usize)?
                .checked_mul(primitives_per_texel as usize),
            FormatAttributes::Compressed { block, .. } => {
                if block.dims_valid(dims) {
                    block.blocks_for_dims(dims)?.checked_mul(block.block_bytes())
                } else {
                    None
                }
            }
        }
    }
}
