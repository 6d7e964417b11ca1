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

//! Parameters used to control how a texture gets sampled by shaders.

/// The sampling behavior used for coordinates that fall outside of the `0.0..=1.0` range.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TextureWrap {
    /// Samples the edge texel of the image.
    Clamp,
    /// Tile the underlying texture.
    Repeat,
    /// **Default value.** Tile the underlying image, mirroring it on each tile.
    Mirror,
}

/// The function used to sample from the texture, for both minification and magnification.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Filter {
    /// Use nearest-neighbor filtering.
    Nearest,
    /// Weighted average of the four nearest texels.
    Linear,
    /// Choose the mipmap that most closely matches the texture's on-screen size, and perform
    /// [`Nearest`] filtering on that mipmap.
    ///
    /// [`Nearest`]: ./enum.Filter.html#variant.Nearest
    MipmapNearest,
    /// **Default value.** Choose the two mipmaps closest to the texture's on-screen size, filter
    /// each of them, then take the weighted average of the two.
    MipmapLinear,
}

impl Filter {
    /// The equivalent filter that doesn't read from mipmaps.
    #[inline]
    pub fn without_mipmaps(self) -> Filter {
        match self {
            Filter::MipmapNearest => Filter::Nearest,
            Filter::MipmapLinear => Filter::Linear,
            f => f,
        }
    }

    #[inline]
    pub fn uses_mipmaps(self) -> bool {
        self != self.without_mipmaps()
    }
}

/// How the values of a depth texture get exposed to a shader.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DepthMode {
    Alpha,
    Intensity,
    /// **Default value.**
    Luminance,
}

/// Comparison function used when depth comparison is enabled.
///
/// The texel passes when `reference <test> texel` holds.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PixelTest {
    Equal,
    /// **Default value.**
    Greater,
    Less,
    GreaterEqual,
    LessEqual,
    NotEqual,
    Never,
    Always,
}

/// Collection of parameters that control how a texture gets sampled.
///
/// Applying a whole parameter set to a texture marks every parameter as changed.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TextureParameters {
    /// Wrap behavior along the texture's horizontal axis.
    pub wrap_s: TextureWrap,
    /// Wrap behavior along the texture's vertical axis.
    pub wrap_t: TextureWrap,
    /// Wrap behavior along the texture's depth axis.
    pub wrap_r: TextureWrap,
    pub filter: Filter,
    pub depth_mode: DepthMode,
    pub depth_compare_test: PixelTest,
    pub depth_compare_enabled: bool,
    /// Amount of anisotropic filtering, from `0.0` (none) to `1.0` (the most the hardware
    /// supports).
    pub anisotropic_filtering: f32,
}

impl TextureParameters {
    /// Set the wrap behavior of every axis at once.
    #[inline]
    pub fn with_wrap(mut self, wrap: TextureWrap) -> TextureParameters {
        self.wrap_s = wrap;
        self.wrap_t = wrap;
        self.wrap_r = wrap;
        self
    }

    #[inline]
    pub fn with_filter(mut self, filter: Filter) -> TextureParameters {
        self.filter = filter;
        self
    }
}

impl Default for TextureWrap {
    #[inline(always)]
    fn default() -> TextureWrap {
        TextureWrap::Mirror
    }
}

impl Default for Filter {
    #[inline(always)]
    fn default() -> Filter {
        Filter::MipmapLinear
    }
}

impl Default for DepthMode {
    #[inline(always)]
    fn default() -> DepthMode {
        DepthMode::Luminance
    }
}

impl Default for PixelTest {
    #[inline(always)]
    fn default() -> PixelTest {
        PixelTest::Greater
    }
}

impl Default for TextureParameters {
    #[inline(always)]
    fn default() -> TextureParameters {
        TextureParameters {
            wrap_s: TextureWrap::default(),
            wrap_t: TextureWrap::default(),
            wrap_r: TextureWrap::default(),
            filter: Filter::default(),
            depth_mode: DepthMode::default(),
            depth_compare_test: PixelTest::default(),
            depth_compare_enabled: false,
            anisotropic_filtering: 0.0,
        }
    }
}
