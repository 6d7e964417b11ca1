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

//! Textures and their sampling parameters.
//!
//! A [`TextureImage`] has a fixed target, format, data type, and base size. Its client-side data
//! is a chain of [`BufferData`]s, one per mipmap level (or one chain per face, for cube maps). The
//! chain may also be absent entirely, in which case the texture is *headless*: only the renderer
//! holds its texels.
//!
//! [`TextureImage`]: ./struct.TextureImage.html
//! [`BufferData`]: ../buffer/struct.BufferData.html

pub mod dirty;
pub mod sample_parameters;

pub use self::{
    dirty::{DirtyBox, DirtyRegions, MipmapDirtyRegion, ParameterDirty, TextureDirtyDescriptor},
    sample_parameters::{DepthMode, Filter, PixelTest, TextureParameters, TextureWrap},
};

use crate::{
    buffer::{BufferArray, BufferData, BufferError, DataType},
    error::ErrorKind,
    image_format::TextureFormat,
    resource::{RenderDataCache, Resource},
};
use cgmath::Vector3;
use derive_more::Display;
use log::{debug, trace};

use std::{convert::TryFrom, error::Error};

/// The kind of texture, which determines how its images are shaped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureTarget {
    T1D,
    T2D,
    T3D,
    CubeMap,
    /// A 2D texture addressed with texel coordinates. Never mipmapped.
    Rectangle,
}

/// A face of a cube map.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CubeFace {
    PositiveX = 0,
    PositiveY = 1,
    PositiveZ = 2,
    NegativeX = 3,
    NegativeY = 4,
    NegativeZ = 5,
}

impl CubeFace {
    pub const ALL: [CubeFace; 6] = [
        CubeFace::PositiveX,
        CubeFace::PositiveY,
        CubeFace::PositiveZ,
        CubeFace::NegativeX,
        CubeFace::NegativeY,
        CubeFace::NegativeZ,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Client data for a mipmap chain: one entry per level.
///
/// Every entry must be present, or every entry must be absent. A list of absent entries describes
/// a headless chain with that many levels.
pub type Mipmaps = Vec<Option<BufferData>>;

/// New client data for a texture, shaped for its target.
#[derive(Debug, Clone, PartialEq)]
pub enum TextureData {
    /// Data for a 1D, 2D or 3D texture. `None` makes the texture headless with a full mipmap
    /// chain.
    Mipmaps(Option<Mipmaps>),
    /// Data for each face of a cube map, indexed by [`CubeFace::index`].
    ///
    /// [`CubeFace::index`]: ./enum.CubeFace.html#method.index
    CubeFaces([Option<Mipmaps>; 6]),
    /// Data for a rectangle texture's only image.
    Rectangle(Option<BufferData>),
}

/// Error returned when a texture's shape, format, or data is invalid.
#[derive(Debug, Display, Clone, PartialEq)]
pub enum TextureError {
    #[display(fmt = "texture dimensions must be positive, got {}x{}x{}", width, height, depth)]
    ZeroDimensions { width: u32, height: u32, depth: u32 },
    #[display(fmt = "{:?} textures don't support the {:?} format", target, format)]
    UnsupportedFormat {
        target: TextureTarget,
        format: TextureFormat,
    },
    #[display(fmt = "the {:?} format can't store {} data", format, data_type)]
    InvalidDataType {
        format: TextureFormat,
        data_type: DataType,
    },
    #[display(fmt = "compressed format {:?} requires client data", _0)]
    HeadlessCompressed(TextureFormat),
    #[display(fmt = "data shaped for the wrong target; texture is {:?}", target)]
    DataShape { target: TextureTarget },
    #[display(fmt = "expected 1 or {} mipmap levels, got {}", expected, found)]
    MipmapCount { expected: usize, found: usize },
    #[display(fmt = "mipmap levels must be either all present or all absent")]
    PartialData,
    #[display(fmt = "level {} holds {} data, but the texture holds {}", level, found, expected)]
    LevelDataType {
        level: usize,
        expected: DataType,
        found: DataType,
    },
    #[display(fmt = "level {} needs capacity {}, got {}", level, expected, found)]
    LevelCapacity {
        level: usize,
        expected: usize,
        found: usize,
    },
    #[display(fmt = "level {} dimensions {}x{}x{} can't be stored in the texture's format", level, width, height, depth)]
    LevelDimensions {
        level: usize,
        width: u32,
        height: u32,
        depth: u32,
    },
    #[display(fmt = "cube map faces must be all headless or all populated")]
    MixedFaces,
    #[display(fmt = "face {:?} has {} mipmap levels, but other faces have {}", face, found, expected)]
    FaceMipmapMismatch {
        face: CubeFace,
        expected: usize,
        found: usize,
    },
    #[display(fmt = "face {:?}: {}", face, error)]
    InvalidFace {
        face: CubeFace,
        error: Box<TextureError>,
    },
    #[display(fmt = "mipmap level {} out of range; texture has {} levels", level, num_mipmaps)]
    LevelOutOfRange { level: usize, num_mipmaps: usize },
    #[display(fmt = "cube map images must be accessed through a face")]
    FaceRequired,
    #[display(fmt = "{:?} textures don't have faces", _0)]
    NotACubeMap(TextureTarget),
    #[display(fmt = "texture is headless")]
    Headless,
    #[display(fmt = "{}", _0)]
    Buffer(BufferError),
}

impl TextureError {
    pub fn kind(&self) -> ErrorKind {
        match *self {
            TextureError::FaceRequired
            | TextureError::NotACubeMap(_)
            | TextureError::Headless
            | TextureError::HeadlessCompressed(_) => ErrorKind::InvalidState,
            TextureError::InvalidFace { ref error, .. } => error.kind(),
            _ => ErrorKind::InvalidArgument,
        }
    }
}

impl Error for TextureError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match *self {
            TextureError::InvalidFace { ref error, .. } => Some(&**error),
            TextureError::Buffer(ref error) => Some(error),
            _ => None,
        }
    }
}

impl From<BufferError> for TextureError {
    #[inline]
    fn from(error: BufferError) -> TextureError {
        TextureError::Buffer(error)
    }
}

/// The number of mipmap levels in a full chain for the given base size.
///
/// This is `floor(log2(max(width, height, depth))) + 1`, or `None` if any dimension is zero.
///
/// ```
/// use ferox::texture::calculate_mipmap_count;
///
/// assert_eq!(calculate_mipmap_count(256, 256, 1), Some(9));
/// assert_eq!(calculate_mipmap_count(300, 1, 1), Some(9));
/// assert_eq!(calculate_mipmap_count(1, 1, 1), Some(1));
/// assert_eq!(calculate_mipmap_count(0, 4, 1), None);
/// ```
pub fn calculate_mipmap_count(width: u32, height: u32, depth: u32) -> Option<usize> {
    if width == 0 || height == 0 || depth == 0 {
        return None;
    }
    let max = width.max(height).max(depth);
    Some((32 - max.leading_zeros()) as usize)
}

/// The dimensions of a mipmap level: each base dimension halved `level` times, but never below 1.
pub fn mipmap_dimensions(base: Vector3<u32>, level: usize) -> Vector3<u32> {
    let shift = u32::try_from(level).unwrap_or(u32::max_value());
    let shrink = |dim: u32| dim.checked_shr(shift).unwrap_or(0).max(1);
    Vector3::new(shrink(base.x), shrink(base.y), shrink(base.z))
}

/// Validated client data, tagged with the texture's target and base size.
#[derive(Debug, Clone, PartialEq)]
enum Payload {
    T1D {
        width: u32,
        mipmaps: Option<Vec<BufferData>>,
    },
    T2D {
        width: u32,
        height: u32,
        mipmaps: Option<Vec<BufferData>>,
    },
    T3D {
        width: u32,
        height: u32,
        depth: u32,
        mipmaps: Option<Vec<BufferData>>,
    },
    CubeMap {
        side: u32,
        /// Always six chains long, indexed by `CubeFace::index`.
        faces: Option<Vec<Vec<BufferData>>>,
    },
    Rectangle {
        width: u32,
        height: u32,
        image: Option<BufferData>,
    },
}

impl Payload {
    fn target(&self) -> TextureTarget {
        match *self {
            Payload::T1D { .. } => TextureTarget::T1D,
            Payload::T2D { .. } => TextureTarget::T2D,
            Payload::T3D { .. } => TextureTarget::T3D,
            Payload::CubeMap { .. } => TextureTarget::CubeMap,
            Payload::Rectangle { .. } => TextureTarget::Rectangle,
        }
    }

    fn dims(&self) -> Vector3<u32> {
        match *self {
            Payload::T1D { width, .. } => Vector3::new(width, 1, 1),
            Payload::T2D { width, height, .. } | Payload::Rectangle { width, height, .. } => {
                Vector3::new(width, height, 1)
            }
            Payload::T3D { width, height, depth, .. } => Vector3::new(width, height, depth),
            Payload::CubeMap { side, .. } => Vector3::new(side, side, 1),
        }
    }

    fn is_headless(&self) -> bool {
        match *self {
            Payload::T1D { ref mipmaps, .. }
            | Payload::T2D { ref mipmaps, .. }
            | Payload::T3D { ref mipmaps, .. } => mipmaps.is_none(),
            Payload::CubeMap { ref faces, .. } => faces.is_none(),
            Payload::Rectangle { ref image, .. } => image.is_none(),
        }
    }

    fn image(&self, face: usize, level: usize) -> Option<&BufferData> {
        match *self {
            Payload::T1D { ref mipmaps, .. }
            | Payload::T2D { ref mipmaps, .. }
            | Payload::T3D { ref mipmaps, .. } => mipmaps.as_ref()?.get(level),
            Payload::CubeMap { ref faces, .. } => faces.as_ref()?.get(face)?.get(level),
            Payload::Rectangle { ref image, .. } => image.as_ref().filter(|_| level == 0),
        }
    }

    fn image_mut(&mut self, face: usize, level: usize) -> Option<&mut BufferData> {
        match *self {
            Payload::T1D { ref mut mipmaps, .. }
            | Payload::T2D { ref mut mipmaps, .. }
            | Payload::T3D { ref mut mipmaps, .. } => mipmaps.as_mut()?.get_mut(level),
            Payload::CubeMap { ref mut faces, .. } => faces.as_mut()?.get_mut(face)?.get_mut(level),
            Payload::Rectangle { ref mut image, .. } => image.as_mut().filter(|_| level == 0),
        }
    }
}

/// The shape rules shared by every target.
#[derive(Debug, Clone, Copy)]
struct Shape {
    target: TextureTarget,
    dims: Vector3<u32>,
    format: TextureFormat,
    data_type: DataType,
}

impl Shape {
    fn new(
        target: TextureTarget,
        dims: Vector3<u32>,
        format: TextureFormat,
        data_type: DataType,
    ) -> Result<Shape, TextureError> {
        if dims.x == 0 || dims.y == 0 || dims.z == 0 {
            return Err(TextureError::ZeroDimensions {
                width: dims.x,
                height: dims.y,
                depth: dims.z,
            });
        }
        if !format.is_type_valid(data_type) {
            return Err(TextureError::InvalidDataType { format, data_type });
        }

        let supported = match target {
            TextureTarget::T1D | TextureTarget::Rectangle => !format.is_compressed(),
            TextureTarget::T2D => true,
            TextureTarget::T3D => !format.is_compressed() && !format.is_depth(),
            TextureTarget::CubeMap => !format.is_depth(),
        };
        if !supported {
            return Err(TextureError::UnsupportedFormat { target, format });
        }

        Ok(Shape {
            target,
            dims,
            format,
            data_type,
        })
    }

    fn full_mipmap_count(&self) -> usize {
        match self.target {
            TextureTarget::Rectangle => 1,
            _ => calculate_mipmap_count(self.dims.x, self.dims.y, self.dims.z).unwrap_or(1),
        }
    }

    fn check_headless(&self) -> Result<(), TextureError> {
        if self.format.is_compressed() {
            Err(TextureError::HeadlessCompressed(self.format))
        } else {
            Ok(())
        }
    }

    fn check_level(&self, level: usize, buffer: &BufferData) -> Result<(), TextureError> {
        if buffer.data_type() != self.data_type {
            return Err(TextureError::LevelDataType {
                level,
                expected: self.data_type,
                found: buffer.data_type(),
            });
        }

        let dims = mipmap_dimensions(self.dims, level);
        let expected = self
            .format
            .buffer_size(dims.x, dims.y, dims.z)
            .ok_or(TextureError::LevelDimensions {
                level,
                width: dims.x,
                height: dims.y,
                depth: dims.z,
            })?;
        if buffer.capacity() != expected {
            return Err(TextureError::LevelCapacity {
                level,
                expected,
                found: buffer.capacity(),
            });
        }
        Ok(())
    }

    /// Validate one mipmap chain, returning the owned levels (`None` if headless) and the number
    /// of levels.
    fn validate_chain(
        &self,
        data: Option<Mipmaps>,
    ) -> Result<(Option<Vec<BufferData>>, usize), TextureError> {
        let expected = self.full_mipmap_count();
        let levels = match data {
            Some(levels) => levels,
            None => {
                self.check_headless()?;
                return Ok((None, expected));
            }
        };

        if levels.len() != 1 && levels.len() != expected {
            return Err(TextureError::MipmapCount {
                expected,
                found: levels.len(),
            });
        }

        let present = levels.iter().filter(|l| l.is_some()).count();
        if present == 0 {
            self.check_headless()?;
            return Ok((None, levels.len()));
        } else if present != levels.len() {
            return Err(TextureError::PartialData);
        }

        let levels: Vec<BufferData> = levels.into_iter().flatten().collect();
        for (level, buffer) in levels.iter().enumerate() {
            self.check_level(level, buffer)?;
        }
        let num_mipmaps = levels.len();
        Ok((Some(levels), num_mipmaps))
    }

    fn validate_faces(
        &self,
        faces: [Option<Mipmaps>; 6],
    ) -> Result<(Option<Vec<Vec<BufferData>>>, usize), TextureError> {
        let mut validated = Vec::with_capacity(6);
        for (&face, data) in CubeFace::ALL.iter().zip(Vec::from(faces)) {
            let chain = self
                .validate_chain(data)
                .map_err(|error| TextureError::InvalidFace {
                    face,
                    error: Box::new(error),
                })?;
            validated.push((face, chain));
        }

        let populated = validated.iter().filter(|(_, (m, _))| m.is_some()).count();
        if populated != 0 && populated != 6 {
            return Err(TextureError::MixedFaces);
        }

        let num_mipmaps = (validated[0].1).1;
        if let Some(&(face, (_, found))) = validated.iter().find(|(_, (_, n))| *n != num_mipmaps) {
            return Err(TextureError::FaceMipmapMismatch {
                face,
                expected: num_mipmaps,
                found,
            });
        }

        let faces = match populated {
            0 => None,
            _ => Some(
                validated
                    .into_iter()
                    .filter_map(|(_, (chain, _))| chain)
                    .collect(),
            ),
        };
        Ok((faces, num_mipmaps))
    }

    /// Build a full candidate payload from `data`, without touching any texture.
    fn validate(&self, data: TextureData) -> Result<(Payload, usize), TextureError> {
        let Vector3 {
            x: width,
            y: height,
            z: depth,
        } = self.dims;

        match (self.target, data) {
            (TextureTarget::T1D, TextureData::Mipmaps(data)) => {
                let (mipmaps, n) = self.validate_chain(data)?;
                Ok((Payload::T1D { width, mipmaps }, n))
            }
            (TextureTarget::T2D, TextureData::Mipmaps(data)) => {
                let (mipmaps, n) = self.validate_chain(data)?;
                Ok((Payload::T2D { width, height, mipmaps }, n))
            }
            (TextureTarget::T3D, TextureData::Mipmaps(data)) => {
                let (mipmaps, n) = self.validate_chain(data)?;
                Ok((Payload::T3D { width, height, depth, mipmaps }, n))
            }
            (TextureTarget::CubeMap, TextureData::CubeFaces(data)) => {
                let (faces, n) = self.validate_faces(data)?;
                Ok((Payload::CubeMap { side: width, faces }, n))
            }
            (TextureTarget::Rectangle, TextureData::Rectangle(data)) => {
                let (mut image, n) = self.validate_chain(Some(vec![data]))?;
                let image = image.as_mut().and_then(Vec::pop);
                Ok((Payload::Rectangle { width, height, image }, n))
            }
            (target, _) => Err(TextureError::DataShape { target }),
        }
    }
}

/// A texture resource.
///
/// The target, format, data type, and base dimensions are fixed at creation. The client data can
/// be replaced, either wholesale with [`set_data`] or one level at a time with
/// [`set_level_contents`]. Both re-validate the new data and leave the texture untouched if it's
/// rejected.
///
/// Every mutation is recorded in the texture's [`TextureDirtyDescriptor`], which the renderer
/// clears once it has uploaded the changes.
///
/// [`set_data`]: #method.set_data
/// [`set_level_contents`]: #method.set_level_contents
/// [`TextureDirtyDescriptor`]: ./dirty/struct.TextureDirtyDescriptor.html
#[derive(Debug)]
pub struct TextureImage {
    format: TextureFormat,
    data_type: DataType,
    num_mipmaps: usize,
    payload: Payload,
    parameters: TextureParameters,
    dirty: TextureDirtyDescriptor,
    render_data: RenderDataCache,
}

impl TextureImage {
    /// Create a one-dimensional texture.
    pub fn texture_1d(
        data: Option<Mipmaps>,
        width: u32,
        format: TextureFormat,
        data_type: DataType,
    ) -> Result<TextureImage, TextureError> {
        let shape = Shape::new(TextureTarget::T1D, Vector3::new(width, 1, 1), format, data_type)?;
        TextureImage::new(shape, TextureData::Mipmaps(data))
    }

    /// Create a two-dimensional texture.
    ///
    /// ```
    /// use ferox::{buffer::DataType, image_format::TextureFormat, texture::TextureImage};
    ///
    /// let texture = TextureImage::texture_2d(None, 64, 64, TextureFormat::Rgba, DataType::UnsignedByte).unwrap();
    /// assert_eq!(texture.num_mipmaps(), 7);
    /// assert!(texture.data(0).unwrap().is_none());
    /// ```
    pub fn texture_2d(
        data: Option<Mipmaps>,
        width: u32,
        height: u32,
        format: TextureFormat,
        data_type: DataType,
    ) -> Result<TextureImage, TextureError> {
        let dims = Vector3::new(width, height, 1);
        let shape = Shape::new(TextureTarget::T2D, dims, format, data_type)?;
        TextureImage::new(shape, TextureData::Mipmaps(data))
    }

    /// Create a three-dimensional texture. Compressed and depth formats aren't supported.
    pub fn texture_3d(
        data: Option<Mipmaps>,
        width: u32,
        height: u32,
        depth: u32,
        format: TextureFormat,
        data_type: DataType,
    ) -> Result<TextureImage, TextureError> {
        let dims = Vector3::new(width, height, depth);
        let shape = Shape::new(TextureTarget::T3D, dims, format, data_type)?;
        TextureImage::new(shape, TextureData::Mipmaps(data))
    }

    /// Create a cube map with square faces. Depth formats aren't supported.
    ///
    /// Either every face is headless or every face has data, and every face must have the same
    /// number of mipmap levels.
    pub fn cube_map(
        faces: [Option<Mipmaps>; 6],
        side: u32,
        format: TextureFormat,
        data_type: DataType,
    ) -> Result<TextureImage, TextureError> {
        let dims = Vector3::new(side, side, 1);
        let shape = Shape::new(TextureTarget::CubeMap, dims, format, data_type)?;
        TextureImage::new(shape, TextureData::CubeFaces(faces))
    }

    /// Create a rectangle texture. Rectangles have a single level, always clamp, and don't
    /// support compressed formats.
    pub fn rectangle(
        data: Option<BufferData>,
        width: u32,
        height: u32,
        format: TextureFormat,
        data_type: DataType,
    ) -> Result<TextureImage, TextureError> {
        let dims = Vector3::new(width, height, 1);
        let shape = Shape::new(TextureTarget::Rectangle, dims, format, data_type)?;
        TextureImage::new(shape, TextureData::Rectangle(data))
    }

    fn new(shape: Shape, data: TextureData) -> Result<TextureImage, TextureError> {
        let (payload, num_mipmaps) = shape.validate(data)?;
        let mut texture = TextureImage {
            format: shape.format,
            data_type: shape.data_type,
            num_mipmaps,
            payload,
            parameters: TextureParameters::default(),
            dirty: TextureDirtyDescriptor::new(shape.target == TextureTarget::CubeMap),
            render_data: RenderDataCache::new(),
        };
        texture.set_parameters(TextureParameters::default());
        texture.mark_dirty();

        debug!(
            "created {:?} texture {:?}, {} mipmaps{}",
            shape.target,
            shape.dims,
            num_mipmaps,
            if texture.is_headless() { ", headless" } else { "" }
        );
        Ok(texture)
    }

    /// Apply a full set of sampling parameters when building a texture.
    #[inline]
    pub fn with_parameters(mut self, parameters: TextureParameters) -> TextureImage {
        self.set_parameters(parameters);
        self
    }

    fn shape(&self) -> Shape {
        Shape {
            target: self.target(),
            dims: self.dimensions(),
            format: self.format,
            data_type: self.data_type,
        }
    }

    /// Replace the texture's client data.
    ///
    /// The new data is validated against the texture's existing shape. On success every level
    /// gets marked dirty; on failure the texture is left exactly as it was.
    pub fn set_data(&mut self, data: TextureData) -> Result<(), TextureError> {
        let (payload, num_mipmaps) = self.shape().validate(data)?;
        self.payload = payload;
        self.num_mipmaps = num_mipmaps;
        self.mark_dirty();

        debug!(
            "replaced {:?} texture data, {} mipmaps",
            self.target(),
            num_mipmaps
        );
        Ok(())
    }

    /// Replace the contents of one level's buffer, marking the level dirty.
    ///
    /// Fails on headless textures and cube maps.
    pub fn set_level_contents(
        &mut self,
        level: usize,
        contents: Option<BufferArray>,
    ) -> Result<(), TextureError> {
        if self.target() == TextureTarget::CubeMap {
            return Err(TextureError::FaceRequired);
        }
        self.replace_contents(None, level, contents)
    }

    /// Replace the contents of one level of a cube map face, marking that face's level dirty.
    pub fn set_face_level_contents(
        &mut self,
        face: CubeFace,
        level: usize,
        contents: Option<BufferArray>,
    ) -> Result<(), TextureError> {
        if self.target() != TextureTarget::CubeMap {
            return Err(TextureError::NotACubeMap(self.target()));
        }
        self.replace_contents(Some(face), level, contents)
    }

    fn replace_contents(
        &mut self,
        face: Option<CubeFace>,
        level: usize,
        contents: Option<BufferArray>,
    ) -> Result<(), TextureError> {
        self.check_level(level)?;
        let buffer = self
            .payload
            .image_mut(face.map_or(0, CubeFace::index), level)
            .ok_or(TextureError::Headless)?;
        buffer.set_data(contents)?;

        match face {
            Some(face) => self.mark_face_level_dirty(face, level),
            None => self.mark_level_dirty(level),
        }
        Ok(())
    }

    #[inline]
    pub fn target(&self) -> TextureTarget {
        self.payload.target()
    }

    #[inline]
    pub fn format(&self) -> TextureFormat {
        self.format
    }

    #[inline]
    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    /// The base level's dimensions. Unused axes are 1.
    #[inline]
    pub fn dimensions(&self) -> Vector3<u32> {
        self.payload.dims()
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.dimensions().x
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.dimensions().y
    }

    #[inline]
    pub fn depth(&self) -> u32 {
        self.dimensions().z
    }

    #[inline]
    pub fn mipmap_dimensions(&self, level: usize) -> Vector3<u32> {
        mipmap_dimensions(self.dimensions(), level)
    }

    #[inline]
    pub fn num_mipmaps(&self) -> usize {
        self.num_mipmaps
    }

    /// Whether the texture has no client-side data.
    #[inline]
    pub fn is_headless(&self) -> bool {
        self.payload.is_headless()
    }

    fn check_level(&self, level: usize) -> Result<(), TextureError> {
        if level < self.num_mipmaps {
            Ok(())
        } else {
            Err(TextureError::LevelOutOfRange {
                level,
                num_mipmaps: self.num_mipmaps,
            })
        }
    }

    /// The client data of a mipmap level, or `None` if the texture is headless.
    ///
    /// Cube maps must use [`face_data`](#method.face_data) instead.
    pub fn data(&self, level: usize) -> Result<Option<&BufferData>, TextureError> {
        if self.target() == TextureTarget::CubeMap {
            return Err(TextureError::FaceRequired);
        }
        self.check_level(level)?;
        Ok(self.payload.image(0, level))
    }

    /// The client data of a cube map face's mipmap level, or `None` if the cube map is headless.
    pub fn face_data(&self, face: CubeFace, level: usize) -> Result<Option<&BufferData>, TextureError> {
        if self.target() != TextureTarget::CubeMap {
            return Err(TextureError::NotACubeMap(self.target()));
        }
        self.check_level(level)?;
        Ok(self.payload.image(face.index(), level))
    }

    fn mark(&mut self, face: Option<CubeFace>, region: DirtyBox, level: usize) {
        if level >= self.num_mipmaps {
            trace!(
                "ignoring dirty mark on level {} of a texture with {} mipmaps",
                level,
                self.num_mipmaps
            );
            return;
        }
        let level_dims = self.mipmap_dimensions(level);
        trace!("marking {:?} dirty on level {} (face {:?})", region, level, face);
        self.dirty.regions_mut().mark(face, level, region, level_dims);
    }

    /// Mark a region of a mipmap level dirty. On a cube map, the region gets marked on every
    /// face.
    ///
    /// The region is clamped to the level's bounds. Out-of-range levels are ignored.
    #[inline]
    pub fn mark_region_dirty(&mut self, region: DirtyBox, level: usize) {
        self.mark(None, region, level);
    }

    /// Mark a region of one cube map face's level dirty. Does nothing on other targets.
    pub fn mark_face_region_dirty(&mut self, face: CubeFace, region: DirtyBox, level: usize) {
        if self.target() == TextureTarget::CubeMap {
            self.mark(Some(face), region, level);
        }
    }

    /// Mark an entire mipmap level dirty.
    pub fn mark_level_dirty(&mut self, level: usize) {
        let dims = self.mipmap_dimensions(level);
        self.mark(None, DirtyBox::full(dims), level);
    }

    pub fn mark_face_level_dirty(&mut self, face: CubeFace, level: usize) {
        let dims = self.mipmap_dimensions(level);
        self.mark_face_region_dirty(face, DirtyBox::full(dims), level);
    }

    /// Mark every level of one cube map face dirty.
    pub fn mark_face_dirty(&mut self, face: CubeFace) {
        for level in 0..self.num_mipmaps {
            self.mark_face_level_dirty(face, level);
        }
    }

    /// Mark the whole texture dirty, discarding any previously tracked regions.
    pub fn mark_dirty(&mut self) {
        let base = self.dimensions();
        self.dirty
            .regions_mut()
            .mark_all(self.num_mipmaps, |level| mipmap_dimensions(base, level));
    }

    #[inline]
    fn constrain_wrap(&self, wrap: Option<TextureWrap>) -> TextureWrap {
        match self.target() {
            TextureTarget::Rectangle => TextureWrap::Clamp,
            _ => wrap.unwrap_or_default(),
        }
    }

    #[inline]
    pub fn wrap_s(&self) -> TextureWrap {
        self.parameters.wrap_s
    }

    #[inline]
    pub fn wrap_t(&self) -> TextureWrap {
        self.parameters.wrap_t
    }

    #[inline]
    pub fn wrap_r(&self) -> TextureWrap {
        self.parameters.wrap_r
    }

    /// Set the horizontal wrap mode. `None` resets it to [`TextureWrap::Mirror`].
    ///
    /// Rectangle textures always clamp, regardless of the requested mode.
    ///
    /// [`TextureWrap::Mirror`]: ./sample_parameters/enum.TextureWrap.html#variant.Mirror
    pub fn set_wrap_s(&mut self, wrap: Option<TextureWrap>) {
        self.parameters.wrap_s = self.constrain_wrap(wrap);
        self.dirty.flag(ParameterDirty::WRAP);
    }

    pub fn set_wrap_t(&mut self, wrap: Option<TextureWrap>) {
        self.parameters.wrap_t = self.constrain_wrap(wrap);
        self.dirty.flag(ParameterDirty::WRAP);
    }

    pub fn set_wrap_r(&mut self, wrap: Option<TextureWrap>) {
        self.parameters.wrap_r = self.constrain_wrap(wrap);
        self.dirty.flag(ParameterDirty::WRAP);
    }

    /// Set the wrap mode of every axis.
    pub fn set_wrap(&mut self, wrap: Option<TextureWrap>) {
        self.set_wrap_s(wrap);
        self.set_wrap_t(wrap);
        self.set_wrap_r(wrap);
    }

    /// The filter used to sample the texture.
    ///
    /// If the texture only has one mipmap level, mipmapped filters are reported as their
    /// non-mipmapped equivalents.
    pub fn filter(&self) -> Filter {
        match self.num_mipmaps {
            1 => self.parameters.filter.without_mipmaps(),
            _ => self.parameters.filter,
        }
    }

    /// Set the filter. `None` resets it to [`Filter::MipmapLinear`].
    ///
    /// [`Filter::MipmapLinear`]: ./sample_parameters/enum.Filter.html#variant.MipmapLinear
    pub fn set_filter(&mut self, filter: Option<Filter>) {
        self.parameters.filter = filter.unwrap_or_default();
        self.dirty.flag(ParameterDirty::FILTER);
    }

    #[inline]
    pub fn depth_mode(&self) -> DepthMode {
        self.parameters.depth_mode
    }

    /// `None` resets the depth mode to [`DepthMode::Luminance`].
    ///
    /// [`DepthMode::Luminance`]: ./sample_parameters/enum.DepthMode.html#variant.Luminance
    pub fn set_depth_mode(&mut self, mode: Option<DepthMode>) {
        self.parameters.depth_mode = mode.unwrap_or_default();
        self.dirty.flag(ParameterDirty::DEPTH_COMPARE);
    }

    #[inline]
    pub fn depth_compare_test(&self) -> PixelTest {
        self.parameters.depth_compare_test
    }

    /// `None` resets the test to [`PixelTest::Greater`].
    ///
    /// [`PixelTest::Greater`]: ./sample_parameters/enum.PixelTest.html#variant.Greater
    pub fn set_depth_compare_test(&mut self, test: Option<PixelTest>) {
        self.parameters.depth_compare_test = test.unwrap_or_default();
        self.dirty.flag(ParameterDirty::DEPTH_COMPARE);
    }

    #[inline]
    pub fn is_depth_compare_enabled(&self) -> bool {
        self.parameters.depth_compare_enabled
    }

    pub fn set_depth_compare_enabled(&mut self, enabled: bool) {
        self.parameters.depth_compare_enabled = enabled;
        self.dirty.flag(ParameterDirty::DEPTH_COMPARE);
    }

    #[inline]
    pub fn anisotropic_filtering(&self) -> f32 {
        self.parameters.anisotropic_filtering
    }

    /// Set the amount of anisotropic filtering, clamped to `0.0..=1.0`.
    ///
    /// Only flags the parameter dirty if the clamped value actually changed.
    pub fn set_anisotropic_filtering(&mut self, amount: f32) {
        let amount = amount.max(0.0).min(1.0);
        if amount != self.parameters.anisotropic_filtering {
            self.parameters.anisotropic_filtering = amount;
            self.dirty.flag(ParameterDirty::ANISOTROPY);
        }
    }

    /// The texture's current sampling parameters, with the filter reported as by
    /// [`filter`](#method.filter).
    pub fn parameters(&self) -> TextureParameters {
        TextureParameters {
            filter: self.filter(),
            ..self.parameters
        }
    }

    /// Apply every sampling parameter at once, flagging all of them dirty.
    ///
    /// Unlike [`set_anisotropic_filtering`](#method.set_anisotropic_filtering), this flags the
    /// anisotropy even if its value is unchanged, so a freshly built texture reports every
    /// parameter as dirty.
    pub fn set_parameters(&mut self, parameters: TextureParameters) {
        self.set_wrap_s(Some(parameters.wrap_s));
        self.set_wrap_t(Some(parameters.wrap_t));
        self.set_wrap_r(Some(parameters.wrap_r));
        self.set_filter(Some(parameters.filter));
        self.set_depth_mode(Some(parameters.depth_mode));
        self.set_depth_compare_test(Some(parameters.depth_compare_test));
        self.set_depth_compare_enabled(parameters.depth_compare_enabled);
        self.set_anisotropic_filtering(parameters.anisotropic_filtering);
        self.dirty.flag(ParameterDirty::ANISOTROPY);
    }
}

impl Resource for TextureImage {
    type DirtyDescriptor = TextureDirtyDescriptor;

    #[inline]
    fn dirty_descriptor(&self) -> &TextureDirtyDescriptor {
        &self.dirty
    }

    #[inline]
    fn clear_dirty_descriptor(&mut self) {
        self.dirty.clear();
    }

    #[inline]
    fn render_data_cache(&self) -> &RenderDataCache {
        &self.render_data
    }

    #[inline]
    fn render_data_cache_mut(&mut self) -> &mut RenderDataCache {
        &mut self.render_data
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck::TestResult;

    fn chain(format: TextureFormat, data_type: DataType, base: Vector3<u32>, levels: usize) -> Mipmaps {
        (0..levels)
            .map(|level| {
                let dims = mipmap_dimensions(base, level);
                let size = format.buffer_size(dims.x, dims.y, dims.z).unwrap();
                Some(BufferData::zeroed(size, data_type))
            })
            .collect()
    }

    fn rgba_2d(side: u32, levels: usize) -> Mipmaps {
        chain(TextureFormat::Rgba, DataType::UnsignedByte, Vector3::new(side, side, 1), levels)
    }

    #[test]
    fn mipmap_counts() {
        assert_eq!(calculate_mipmap_count(256, 256, 1), Some(9));
        assert_eq!(calculate_mipmap_count(1, 1, 1), Some(1));
        assert_eq!(calculate_mipmap_count(300, 1, 1), Some(9));
        assert_eq!(calculate_mipmap_count(5, 17, 3), Some(5));
        assert_eq!(calculate_mipmap_count(4, 0, 1), None);
    }

    #[test]
    fn level_dimensions_floor_at_one() {
        let base = Vector3::new(8, 2, 1);
        assert_eq!(mipmap_dimensions(base, 0), Vector3::new(8, 2, 1));
        assert_eq!(mipmap_dimensions(base, 2), Vector3::new(2, 1, 1));
        assert_eq!(mipmap_dimensions(base, 3), Vector3::new(1, 1, 1));
        assert_eq!(mipmap_dimensions(base, 40), Vector3::new(1, 1, 1));
        assert_eq!(mipmap_dimensions(base, usize::max_value()), Vector3::new(1, 1, 1));
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn level_past_u32_range() {
        let base = Vector3::new(1 << 20, 64, 4);
        let level = u32::max_value() as usize + 1;
        assert_eq!(mipmap_dimensions(base, level), Vector3::new(1, 1, 1));
    }

    #[test]
    fn oversized_level_is_rejected() {
        let data = Some(vec![Some(BufferData::with_capacity(1, DataType::Float))]);
        let side = 1 << 22;
        let err = TextureImage::texture_3d(data, side, side, side, TextureFormat::Rgba, DataType::Float)
            .unwrap_err();
        assert_eq!(
            err,
            TextureError::LevelDimensions {
                level: 0,
                width: side,
                height: side,
                depth: side
            }
        );
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);

        let data = Some(vec![Some(BufferData::with_capacity(1, DataType::UnsignedByte))]);
        let err = TextureImage::texture_2d(data, 65536, 65536, TextureFormat::RgbaDxt1, DataType::UnsignedByte)
            .unwrap_err();
        assert_eq!(
            err,
            TextureError::LevelCapacity {
                level: 0,
                expected: 16384 * 16384 * 8,
                found: 1
            }
        );
    }

    #[test]
    fn capacity_per_level() {
        let texture = TextureImage::texture_2d(
            Some(rgba_2d(8, 4)),
            8,
            8,
            TextureFormat::Rgba,
            DataType::UnsignedByte,
        )
        .unwrap();
        assert_eq!(texture.num_mipmaps(), 4);
        assert_eq!(texture.data(2).unwrap().unwrap().capacity(), 16);

        let mut data = rgba_2d(8, 4);
        data[2] = Some(BufferData::zeroed(15, DataType::UnsignedByte));
        let err = TextureImage::texture_2d(Some(data), 8, 8, TextureFormat::Rgba, DataType::UnsignedByte)
            .unwrap_err();
        assert_eq!(
            err,
            TextureError::LevelCapacity {
                level: 2,
                expected: 16,
                found: 15
            }
        );
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }

    #[test]
    fn single_level_is_unmipmapped() {
        let texture = TextureImage::texture_2d(
            Some(rgba_2d(8, 1)),
            8,
            8,
            TextureFormat::Rgba,
            DataType::UnsignedByte,
        )
        .unwrap();
        assert_eq!(texture.num_mipmaps(), 1);
        assert_eq!(texture.filter(), Filter::Linear);
        assert!(texture.data(1).is_err());
    }

    #[test]
    fn wrong_mipmap_count() {
        let err = TextureImage::texture_2d(
            Some(rgba_2d(8, 2)),
            8,
            8,
            TextureFormat::Rgba,
            DataType::UnsignedByte,
        )
        .unwrap_err();
        assert_eq!(err, TextureError::MipmapCount { expected: 4, found: 2 });
    }

    #[test]
    fn partial_data_rejected_for_every_target() {
        let mut d1 = chain(TextureFormat::R, DataType::Float, Vector3::new(4, 1, 1), 3);
        d1[1] = None;
        assert_eq!(
            TextureImage::texture_1d(Some(d1), 4, TextureFormat::R, DataType::Float).unwrap_err(),
            TextureError::PartialData
        );

        let mut d2 = rgba_2d(4, 3);
        d2[0] = None;
        assert_eq!(
            TextureImage::texture_2d(Some(d2), 4, 4, TextureFormat::Rgba, DataType::UnsignedByte)
                .unwrap_err(),
            TextureError::PartialData
        );

        let mut d3 = chain(TextureFormat::Rgb, DataType::UnsignedByte, Vector3::new(4, 4, 4), 3);
        d3[2] = None;
        assert_eq!(
            TextureImage::texture_3d(Some(d3), 4, 4, 4, TextureFormat::Rgb, DataType::UnsignedByte)
                .unwrap_err(),
            TextureError::PartialData
        );

        let mut faces: [Option<Mipmaps>; 6] = Default::default();
        for face in faces.iter_mut() {
            *face = Some(rgba_2d(4, 3));
        }
        if let Some(ref mut levels) = faces[4] {
            levels[1] = None;
        }
        let err = TextureImage::cube_map(faces, 4, TextureFormat::Rgba, DataType::UnsignedByte).unwrap_err();
        assert_eq!(
            err,
            TextureError::InvalidFace {
                face: CubeFace::NegativeY,
                error: Box::new(TextureError::PartialData)
            }
        );
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }

    #[test]
    fn level_type_mismatch() {
        let mut data = rgba_2d(2, 2);
        data[1] = Some(BufferData::zeroed(4, DataType::Byte));
        assert_eq!(
            TextureImage::texture_2d(Some(data), 2, 2, TextureFormat::Rgba, DataType::UnsignedByte)
                .unwrap_err(),
            TextureError::LevelDataType {
                level: 1,
                expected: DataType::UnsignedByte,
                found: DataType::Byte
            }
        );
    }

    #[test]
    fn format_target_rules() {
        use self::TextureFormat::*;
        let ubyte = DataType::UnsignedByte;
        let uint = DataType::UnsignedInt;

        let unsupported = |r: Result<TextureImage, TextureError>| match r {
            Err(TextureError::UnsupportedFormat { .. }) => true,
            _ => false,
        };
        assert!(unsupported(TextureImage::texture_1d(None, 4, RgbaDxt1, ubyte)));
        assert!(unsupported(TextureImage::texture_3d(None, 4, 4, 4, RgbaDxt5, ubyte)));
        assert!(unsupported(TextureImage::texture_3d(None, 4, 4, 4, Depth, uint)));
        assert!(unsupported(TextureImage::cube_map(Default::default(), 4, Depth, uint)));
        assert!(unsupported(TextureImage::rectangle(None, 4, 4, RgbDxt1, ubyte)));

        assert!(TextureImage::texture_2d(None, 4, 4, Depth, uint).is_ok());
        assert!(TextureImage::texture_1d(None, 4, DepthFloat, DataType::Float).is_ok());

        assert_eq!(
            TextureImage::texture_2d(None, 4, 4, RgbaFloat, ubyte).unwrap_err(),
            TextureError::InvalidDataType {
                format: RgbaFloat,
                data_type: ubyte
            }
        );
        assert_eq!(
            TextureImage::texture_2d(None, 0, 4, Rgba, ubyte).unwrap_err(),
            TextureError::ZeroDimensions {
                width: 0,
                height: 4,
                depth: 1
            }
        );
    }

    #[test]
    fn compressed_needs_data() {
        let ubyte = DataType::UnsignedByte;
        assert_eq!(
            TextureImage::texture_2d(None, 8, 8, TextureFormat::RgbaDxt5, ubyte).unwrap_err(),
            TextureError::HeadlessCompressed(TextureFormat::RgbaDxt5)
        );
        assert_eq!(
            TextureImage::texture_2d(None, 8, 8, TextureFormat::RgbaDxt5, ubyte).unwrap_err().kind(),
            ErrorKind::InvalidState
        );

        let data = chain(TextureFormat::RgbaDxt5, ubyte, Vector3::new(8, 8, 1), 4);
        let texture = TextureImage::texture_2d(Some(data), 8, 8, TextureFormat::RgbaDxt5, ubyte).unwrap();
        assert_eq!(texture.data(0).unwrap().unwrap().capacity(), 64);
        assert_eq!(texture.data(3).unwrap().unwrap().capacity(), 16);
    }

    #[test]
    fn headless_level_count() {
        let full = TextureImage::texture_2d(None, 16, 4, TextureFormat::Rg, DataType::Float).unwrap();
        assert_eq!(full.num_mipmaps(), 5);
        assert!(full.is_headless());

        let single =
            TextureImage::texture_2d(Some(vec![None]), 16, 4, TextureFormat::Rg, DataType::Float).unwrap();
        assert_eq!(single.num_mipmaps(), 1);
        assert!(single.is_headless());
        assert_eq!(single.data(0), Ok(None));
    }

    #[test]
    fn cube_faces() {
        let ubyte = DataType::UnsignedByte;
        let mut faces: [Option<Mipmaps>; 6] = Default::default();
        for face in faces.iter_mut() {
            *face = Some(rgba_2d(4, 3));
        }
        let cube = TextureImage::cube_map(faces.clone(), 4, TextureFormat::Rgba, ubyte).unwrap();
        assert_eq!(cube.num_mipmaps(), 3);
        assert_eq!(cube.face_data(CubeFace::NegativeZ, 2).unwrap().unwrap().capacity(), 4);
        assert_eq!(cube.data(0), Err(TextureError::FaceRequired));

        let mut mixed = faces.clone();
        mixed[2] = None;
        assert_eq!(
            TextureImage::cube_map(mixed, 4, TextureFormat::Rgba, ubyte).unwrap_err(),
            TextureError::MixedFaces
        );

        let mut uneven = faces;
        uneven[5] = Some(rgba_2d(4, 1));
        assert_eq!(
            TextureImage::cube_map(uneven, 4, TextureFormat::Rgba, ubyte).unwrap_err(),
            TextureError::FaceMipmapMismatch {
                face: CubeFace::NegativeZ,
                expected: 3,
                found: 1
            }
        );

        let headless = TextureImage::cube_map(Default::default(), 4, TextureFormat::Rgba, ubyte).unwrap();
        assert!(headless.is_headless());
        assert_eq!(headless.face_data(CubeFace::PositiveY, 0), Ok(None));
    }

    #[test]
    fn cube_marking() {
        let mut cube =
            TextureImage::cube_map(Default::default(), 8, TextureFormat::Rgb, DataType::Float).unwrap();
        cube.clear_dirty_descriptor();

        cube.mark_face_region_dirty(CubeFace::PositiveZ, DirtyBox::new_2d(1, 1, 2, 2), 0);
        let regions = cube.dirty_descriptor().regions();
        assert!(regions.is_face_level_dirty(CubeFace::PositiveZ, 0));
        assert!(!regions.is_face_level_dirty(CubeFace::NegativeZ, 0));

        cube.mark_face_dirty(CubeFace::NegativeX);
        let regions = cube.dirty_descriptor().regions();
        assert!((0..4).all(|l| regions.is_face_level_dirty(CubeFace::NegativeX, l)));

        cube.mark_region_dirty(DirtyBox::new_2d(0, 0, 1, 1), 3);
        let regions = cube.dirty_descriptor().regions();
        assert!(CubeFace::ALL.iter().all(|&f| regions.is_face_level_dirty(f, 3)));
    }

    #[test]
    fn face_marks_ignored_off_cube_maps() {
        let mut texture = TextureImage::texture_2d(None, 8, 8, TextureFormat::R, DataType::Byte).unwrap();
        texture.clear_dirty_descriptor();
        texture.mark_face_level_dirty(CubeFace::PositiveX, 0);
        assert!(!texture.dirty_descriptor().is_dirty());
        assert_eq!(
            texture.face_data(CubeFace::PositiveX, 0),
            Err(TextureError::NotACubeMap(TextureTarget::T2D))
        );
    }

    #[test]
    fn last_level_can_be_marked() {
        let mut texture = TextureImage::texture_2d(None, 8, 8, TextureFormat::R, DataType::Byte).unwrap();
        texture.clear_dirty_descriptor();

        texture.mark_level_dirty(3);
        assert!(texture.dirty_descriptor().regions().is_level_dirty(3));
        let region = texture.dirty_descriptor().regions().region(3).unwrap();
        assert_eq!((region.width(), region.height(), region.depth()), (1, 1, 1));

        texture.mark_level_dirty(4);
        assert!(!texture.dirty_descriptor().regions().is_level_dirty(4));
    }

    #[test]
    fn mark_dirty_rebuilds_regions() {
        let mut texture = TextureImage::texture_3d(None, 8, 4, 2, TextureFormat::R, DataType::Short).unwrap();
        texture.clear_dirty_descriptor();
        texture.mark_region_dirty(DirtyBox::new_3d(1, 1, 1, 1, 1, 1), 0);

        texture.mark_dirty();
        let regions = texture.dirty_descriptor().regions();
        for level in 0..texture.num_mipmaps() {
            let region = regions.region(level).unwrap();
            assert_eq!(region.offset(), Vector3::new(0, 0, 0));
            assert_eq!(region.extent(), texture.mipmap_dimensions(level));
        }
    }

    #[test]
    fn parameters() {
        let mut texture = TextureImage::texture_2d(None, 4, 4, TextureFormat::Rgba, DataType::Float).unwrap();
        assert_eq!(texture.parameters(), TextureParameters::default());
        texture.clear_dirty_descriptor();

        texture.set_wrap_t(Some(TextureWrap::Repeat));
        assert!(texture.dirty_descriptor().is_texture_wrap_dirty());
        assert!(!texture.dirty_descriptor().is_filter_dirty());
        texture.set_wrap_t(None);
        assert_eq!(texture.wrap_t(), TextureWrap::Mirror);

        texture.set_depth_compare_test(Some(PixelTest::Less));
        assert!(texture.dirty_descriptor().is_depth_compare_dirty());
        texture.set_depth_mode(None);
        assert_eq!(texture.depth_mode(), DepthMode::Luminance);
        texture.set_depth_compare_test(None);
        assert_eq!(texture.depth_compare_test(), PixelTest::Greater);

        texture.clear_dirty_descriptor();
        texture.set_anisotropic_filtering(0.0);
        assert!(!texture.dirty_descriptor().is_anisotropic_filtering_dirty());
        texture.set_anisotropic_filtering(3.5);
        assert_eq!(texture.anisotropic_filtering(), 1.0);
        assert!(texture.dirty_descriptor().is_anisotropic_filtering_dirty());

        texture.clear_dirty_descriptor();
        let current = texture.parameters();
        texture.set_parameters(current);
        assert!(texture.dirty_descriptor().is_anisotropic_filtering_dirty());
        assert!(texture.dirty_descriptor().is_filter_dirty());

        texture.set_filter(Some(Filter::MipmapNearest));
        assert_eq!(texture.filter(), Filter::MipmapNearest);
        texture.set_filter(None);
        assert_eq!(texture.filter(), Filter::MipmapLinear);
    }

    #[test]
    fn rectangle_always_clamps() {
        let data = BufferData::zeroed(6 * 3 * 3, DataType::UnsignedByte);
        let mut rect = TextureImage::rectangle(Some(data), 6, 3, TextureFormat::Rgb, DataType::UnsignedByte)
            .unwrap()
            .with_parameters(TextureParameters::default().with_wrap(TextureWrap::Repeat));

        assert_eq!(rect.num_mipmaps(), 1);
        assert_eq!(rect.wrap_s(), TextureWrap::Clamp);
        assert_eq!(rect.wrap_r(), TextureWrap::Clamp);
        rect.set_wrap_t(Some(TextureWrap::Mirror));
        assert_eq!(rect.wrap_t(), TextureWrap::Clamp);
        assert_eq!(rect.filter(), Filter::Linear);
        assert!(rect.data(0).unwrap().is_some());
        assert!(rect.data(1).is_err());

        let wrong = BufferData::zeroed(6 * 3 * 4, DataType::UnsignedByte);
        assert!(rect.set_data(TextureData::Rectangle(Some(wrong))).is_err());
        assert_eq!(rect.data(0).unwrap().unwrap().capacity(), 54);
    }

    #[test]
    fn failed_set_data_leaves_texture() {
        let mut texture = TextureImage::texture_2d(
            Some(rgba_2d(4, 3)),
            4,
            4,
            TextureFormat::Rgba,
            DataType::UnsignedByte,
        )
        .unwrap();
        texture.clear_dirty_descriptor();

        let mut bad = rgba_2d(4, 3);
        bad[2] = None;
        assert!(texture.set_data(TextureData::Mipmaps(Some(bad))).is_err());
        assert_eq!(
            texture.set_data(TextureData::Rectangle(None)),
            Err(TextureError::DataShape {
                target: TextureTarget::T2D
            })
        );
        assert_eq!(texture.num_mipmaps(), 3);
        assert!(!texture.is_headless());
        assert!(!texture.dirty_descriptor().is_dirty());

        texture.set_data(TextureData::Mipmaps(None)).unwrap();
        assert!(texture.is_headless());
        assert!(texture.dirty_descriptor().regions().is_level_dirty(2));
    }

    #[test]
    fn level_contents() {
        let mut texture = TextureImage::texture_2d(
            Some(rgba_2d(2, 2)),
            2,
            2,
            TextureFormat::Rgba,
            DataType::UnsignedByte,
        )
        .unwrap();
        texture.clear_dirty_descriptor();

        texture
            .set_level_contents(1, Some(BufferArray::UnsignedByte(vec![9; 4])))
            .unwrap();
        assert_eq!(texture.data(1).unwrap().unwrap().as_slice::<u8>(), Some(&[9u8; 4][..]));
        assert!(texture.dirty_descriptor().regions().is_level_dirty(1));
        assert!(!texture.dirty_descriptor().regions().is_level_dirty(0));

        let err = texture
            .set_level_contents(0, Some(BufferArray::UnsignedByte(vec![9; 4])))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);

        let mut headless = TextureImage::texture_2d(None, 2, 2, TextureFormat::Rgba, DataType::UnsignedByte).unwrap();
        assert_eq!(headless.set_level_contents(0, None), Err(TextureError::Headless));
        assert_eq!(TextureError::Headless.kind(), ErrorKind::InvalidState);
    }

    quickcheck! {
        fn mipmap_count_law(w: u32, h: u32, d: u32) -> TestResult {
            if w == 0 || h == 0 || d == 0 {
                return TestResult::discard();
            }
            let max = w.max(h).max(d) as f64;
            let expected = max.log2().floor() as usize + 1;
            TestResult::from_bool(calculate_mipmap_count(w, h, d) == Some(expected))
        }

        fn full_chain_validates(w: u8, h: u8) -> TestResult {
            if w == 0 || h == 0 {
                return TestResult::discard();
            }
            let (w, h) = (w as u32, h as u32);
            let levels = calculate_mipmap_count(w, h, 1).unwrap();
            let data = chain(TextureFormat::Rgb, DataType::Short, Vector3::new(w, h, 1), levels);
            let texture = TextureImage::texture_2d(Some(data), w, h, TextureFormat::Rgb, DataType::Short);
            TestResult::from_bool(texture.map(|t| t.num_mipmaps()) == Ok(levels))
        }
    }
}
