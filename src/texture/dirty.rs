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

//! Tracking of which parts of a texture changed since a renderer last uploaded it.

use super::CubeFace;
use cgmath::Vector3;

use std::cmp;

/// A box of texels, in the coordinate space of one mipmap level.
///
/// Offsets may be negative and extents may run past the level; the box gets clamped to the level
/// when it's marked dirty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DirtyBox {
    pub offset: Vector3<i32>,
    pub extent: Vector3<u32>,
}

impl DirtyBox {
    #[inline]
    pub fn new(offset: Vector3<i32>, extent: Vector3<u32>) -> DirtyBox {
        DirtyBox { offset, extent }
    }

    #[inline]
    pub fn new_1d(x: i32, width: u32) -> DirtyBox {
        DirtyBox::new(Vector3::new(x, 0, 0), Vector3::new(width, 1, 1))
    }

    #[inline]
    pub fn new_2d(x: i32, y: i32, width: u32, height: u32) -> DirtyBox {
        DirtyBox::new(Vector3::new(x, y, 0), Vector3::new(width, height, 1))
    }

    #[inline]
    pub fn new_3d(x: i32, y: i32, z: i32, width: u32, height: u32, depth: u32) -> DirtyBox {
        DirtyBox::new(Vector3::new(x, y, z), Vector3::new(width, height, depth))
    }

    /// A box covering an entire level of the given dimensions.
    #[inline]
    pub fn full(dims: Vector3<u32>) -> DirtyBox {
        DirtyBox::new(Vector3::new(0, 0, 0), dims)
    }

    /// Clamp the box to `[0, dims)` on every axis, returning the `(min, max)` corners. `None` if
    /// nothing of the box is left.
    fn clamp(&self, dims: Vector3<u32>) -> Option<(Vector3<u32>, Vector3<u32>)> {
        fn axis(offset: i32, extent: u32, max: u32) -> (u32, u32) {
            let max = max as i64;
            let lo = cmp::min(cmp::max(offset as i64, 0), max);
            let hi = cmp::min(cmp::max(offset as i64 + extent as i64, lo), max);
            (lo as u32, hi as u32)
        }

        let (x0, x1) = axis(self.offset.x, self.extent.x, dims.x);
        let (y0, y1) = axis(self.offset.y, self.extent.y, dims.y);
        let (z0, z1) = axis(self.offset.z, self.extent.z, dims.z);

        if x0 == x1 || y0 == y1 || z0 == z1 {
            None
        } else {
            Some((Vector3::new(x0, y0, z0), Vector3::new(x1, y1, z1)))
        }
    }
}

/// The bounding box of everything marked dirty on a single mipmap level.
///
/// Merging is conservative: the region grows to the smallest box containing both the old region
/// and the new box, so texels between two disjoint marks get reported dirty too. Every axis is
/// clamped to `[0, levelDimension)`, including negative offsets on the `y` and `z` axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MipmapDirtyRegion {
    min: Vector3<u32>,
    max: Vector3<u32>,
}

impl MipmapDirtyRegion {
    /// Create a region from an initial box, clamped to a level with the given dimensions.
    ///
    /// The result is empty if the box lies entirely outside the level.
    pub fn new(region: DirtyBox, level_dims: Vector3<u32>) -> MipmapDirtyRegion {
        let mut dirty = MipmapDirtyRegion {
            min: Vector3::new(u32::max_value(), u32::max_value(), u32::max_value()),
            max: Vector3::new(0, 0, 0),
        };
        dirty.merge(region, level_dims);
        dirty
    }

    /// Grow the region to cover `region`, clamped to the level's dimensions.
    pub fn merge(&mut self, region: DirtyBox, level_dims: Vector3<u32>) {
        if let Some((min, max)) = region.clamp(level_dims) {
            self.min = Vector3::new(
                cmp::min(self.min.x, min.x),
                cmp::min(self.min.y, min.y),
                cmp::min(self.min.z, min.z),
            );
            self.max = Vector3::new(
                cmp::max(self.max.x, max.x),
                cmp::max(self.max.y, max.y),
                cmp::max(self.max.z, max.z),
            );
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.min.x >= self.max.x || self.min.y >= self.max.y || self.min.z >= self.max.z
    }

    #[inline]
    pub fn x(&self) -> u32 {
        self.offset().x
    }
    #[inline]
    pub fn y(&self) -> u32 {
        self.offset().y
    }
    #[inline]
    pub fn z(&self) -> u32 {
        self.offset().z
    }
    #[inline]
    pub fn width(&self) -> u32 {
        self.extent().x
    }
    #[inline]
    pub fn height(&self) -> u32 {
        self.extent().y
    }
    #[inline]
    pub fn depth(&self) -> u32 {
        self.extent().z
    }

    pub fn offset(&self) -> Vector3<u32> {
        if self.is_empty() {
            Vector3::new(0, 0, 0)
        } else {
            self.min
        }
    }

    pub fn extent(&self) -> Vector3<u32> {
        if self.is_empty() {
            Vector3::new(0, 0, 0)
        } else {
            self.max - self.min
        }
    }
}

type LevelRegions = Vec<Option<MipmapDirtyRegion>>;

/// Dirty regions of every image in a texture, indexed by mipmap level.
///
/// An entry of `None`, or a level past the end of the list, means that level is unchanged.
#[derive(Debug, Clone, PartialEq)]
pub enum DirtyRegions {
    /// Regions of a texture with a single image per level.
    Levels(LevelRegions),
    /// Regions of each face of a cube map, indexed by [`CubeFace::index`].
    ///
    /// [`CubeFace::index`]: ../enum.CubeFace.html#method.index
    Faces([LevelRegions; 6]),
}

impl DirtyRegions {
    pub(crate) fn new(cube_map: bool) -> DirtyRegions {
        if cube_map {
            DirtyRegions::Faces(Default::default())
        } else {
            DirtyRegions::Levels(Vec::new())
        }
    }

    /// The dirty region of a level. On a cube map, this is the positive X face's region.
    #[inline]
    pub fn region(&self, level: usize) -> Option<&MipmapDirtyRegion> {
        self.face_region(CubeFace::PositiveX, level)
    }

    /// The dirty region of a cube map face's level. On other textures the face is ignored.
    pub fn face_region(&self, face: CubeFace, level: usize) -> Option<&MipmapDirtyRegion> {
        let levels = match *self {
            DirtyRegions::Levels(ref levels) => levels,
            DirtyRegions::Faces(ref faces) => &faces[face.index()],
        };
        levels.get(level).and_then(|r| r.as_ref())
    }

    #[inline]
    pub fn is_level_dirty(&self, level: usize) -> bool {
        self.region(level).is_some()
    }

    #[inline]
    pub fn is_face_level_dirty(&self, face: CubeFace, level: usize) -> bool {
        self.face_region(face, level).is_some()
    }

    /// Whether any image data is dirty.
    pub fn is_dirty(&self) -> bool {
        fn any(levels: &LevelRegions) -> bool {
            levels.iter().any(Option::is_some)
        }
        match *self {
            DirtyRegions::Levels(ref levels) => any(levels),
            DirtyRegions::Faces(ref faces) => faces.iter().any(any),
        }
    }

    /// Merge `region` into a level's dirty region, creating it if needed. `face` is ignored on
    /// textures that aren't cube maps, and `None` marks every face of a cube map.
    pub(crate) fn mark(
        &mut self,
        face: Option<CubeFace>,
        level: usize,
        region: DirtyBox,
        level_dims: Vector3<u32>,
    ) {
        fn mark_level(levels: &mut LevelRegions, level: usize, region: DirtyBox, dims: Vector3<u32>) {
            if levels.len() <= level {
                levels.resize(level + 1, None);
            }
            match levels[level] {
                Some(ref mut dirty) => dirty.merge(region, dims),
                None => {
                    let dirty = MipmapDirtyRegion::new(region, dims);
                    if !dirty.is_empty() {
                        levels[level] = Some(dirty);
                    }
                }
            }
        }

        match (self, face) {
            (DirtyRegions::Levels(levels), _) => mark_level(levels, level, region, level_dims),
            (DirtyRegions::Faces(faces), Some(face)) => {
                mark_level(&mut faces[face.index()], level, region, level_dims)
            }
            (DirtyRegions::Faces(faces), None) => {
                for levels in faces.iter_mut() {
                    mark_level(levels, level, region, level_dims);
                }
            }
        }
    }

    /// Replace every region list with `num_levels` fully-dirty levels.
    pub(crate) fn mark_all<F>(&mut self, num_levels: usize, level_dims: F)
    where
        F: Fn(usize) -> Vector3<u32>,
    {
        let full = || -> LevelRegions {
            (0..num_levels)
                .map(|level| {
                    let dims = level_dims(level);
                    Some(MipmapDirtyRegion::new(DirtyBox::full(dims), dims))
                })
                .collect()
        };

        match *self {
            DirtyRegions::Levels(ref mut levels) => *levels = full(),
            DirtyRegions::Faces(ref mut faces) => {
                for levels in faces.iter_mut() {
                    *levels = full();
                }
            }
        }
    }

    fn clear(&mut self) {
        match *self {
            DirtyRegions::Levels(ref mut levels) => levels.clear(),
            DirtyRegions::Faces(ref mut faces) => faces.iter_mut().for_each(Vec::clear),
        }
    }
}

bitflags! {
    /// Sampling parameters that changed since the last upload.
    pub struct ParameterDirty: u8 {
        const WRAP = 1 << 0;
        const FILTER = 1 << 1;
        /// Depth mode, depth compare test, or depth compare enable.
        const DEPTH_COMPARE = 1 << 2;
        const ANISOTROPY = 1 << 3;
    }
}

/// Everything about a texture that changed since a renderer last cleared the descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureDirtyDescriptor {
    parameters: ParameterDirty,
    regions: DirtyRegions,
}

impl TextureDirtyDescriptor {
    pub(crate) fn new(cube_map: bool) -> TextureDirtyDescriptor {
        TextureDirtyDescriptor {
            parameters: ParameterDirty::all(),
            regions: DirtyRegions::new(cube_map),
        }
    }

    #[inline]
    pub fn parameters(&self) -> ParameterDirty {
        self.parameters
    }

    #[inline]
    pub fn regions(&self) -> &DirtyRegions {
        &self.regions
    }

    #[inline]
    pub fn is_texture_wrap_dirty(&self) -> bool {
        self.parameters.contains(ParameterDirty::WRAP)
    }
    #[inline]
    pub fn is_filter_dirty(&self) -> bool {
        self.parameters.contains(ParameterDirty::FILTER)
    }
    #[inline]
    pub fn is_depth_compare_dirty(&self) -> bool {
        self.parameters.contains(ParameterDirty::DEPTH_COMPARE)
    }
    #[inline]
    pub fn is_anisotropic_filtering_dirty(&self) -> bool {
        self.parameters.contains(ParameterDirty::ANISOTROPY)
    }

    /// Whether anything at all needs to be uploaded.
    #[inline]
    pub fn is_dirty(&self) -> bool {
        !self.parameters.is_empty() || self.regions.is_dirty()
    }

    #[inline]
    pub(crate) fn flag(&mut self, dirty: ParameterDirty) {
        self.parameters.insert(dirty);
    }

    #[inline]
    pub(crate) fn regions_mut(&mut self) -> &mut DirtyRegions {
        &mut self.regions
    }

    pub(crate) fn clear(&mut self) {
        self.parameters = ParameterDirty::empty();
        self.regions.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dims(w: u32, h: u32, d: u32) -> Vector3<u32> {
        Vector3::new(w, h, d)
    }

    #[test]
    fn union_of_disjoint_boxes() {
        let level = dims(64, 64, 1);
        let mut dirty = MipmapDirtyRegion::new(DirtyBox::new_2d(2, 3, 4, 5), level);
        dirty.merge(DirtyBox::new_2d(20, 30, 2, 2), level);

        assert_eq!(dirty.offset(), Vector3::new(2, 3, 0));
        assert_eq!(dirty.extent(), Vector3::new(20, 29, 1));
    }

    #[test]
    fn clamps_every_axis() {
        let level = dims(16, 8, 4);
        let dirty = MipmapDirtyRegion::new(DirtyBox::new_3d(-4, -3, -2, 10, 100, 3), level);

        assert_eq!((dirty.x(), dirty.y(), dirty.z()), (0, 0, 0));
        assert_eq!((dirty.width(), dirty.height(), dirty.depth()), (6, 8, 1));
    }

    #[test]
    fn outside_box_is_ignored() {
        let level = dims(8, 8, 1);
        let mut dirty = MipmapDirtyRegion::new(DirtyBox::new_2d(100, 0, 4, 4), level);
        assert!(dirty.is_empty());
        assert_eq!(dirty.extent(), Vector3::new(0, 0, 0));

        dirty.merge(DirtyBox::new_2d(1, 1, 1, 1), level);
        dirty.merge(DirtyBox::new_2d(-10, 2, 4, 4), level);
        assert_eq!(dirty.offset(), Vector3::new(1, 1, 0));
        assert_eq!(dirty.extent(), Vector3::new(1, 1, 1));
    }

    #[test]
    fn lazily_grown_levels() {
        let mut regions = DirtyRegions::new(false);
        assert!(!regions.is_dirty());

        regions.mark(None, 2, DirtyBox::new_2d(0, 0, 1, 1), dims(4, 4, 1));
        match regions {
            DirtyRegions::Levels(ref levels) => assert_eq!(levels.len(), 3),
            DirtyRegions::Faces(_) => panic!("expected level regions"),
        }
        assert!(!regions.is_level_dirty(0));
        assert!(regions.is_level_dirty(2));
        assert!(!regions.is_level_dirty(7));
    }

    #[test]
    fn cube_faces_marked_independently() {
        let mut regions = DirtyRegions::new(true);
        regions.mark(Some(CubeFace::NegativeY), 0, DirtyBox::new_2d(0, 0, 2, 2), dims(8, 8, 1));
        assert!(regions.is_face_level_dirty(CubeFace::NegativeY, 0));
        assert!(!regions.is_face_level_dirty(CubeFace::PositiveY, 0));

        regions.mark(None, 1, DirtyBox::new_2d(0, 0, 2, 2), dims(4, 4, 1));
        assert!(CubeFace::ALL.iter().all(|&f| regions.is_face_level_dirty(f, 1)));
    }

    #[test]
    fn clear_resets_everything() {
        let mut dirty = TextureDirtyDescriptor::new(false);
        dirty
            .regions_mut()
            .mark_all(3, |level| dims(4 >> level, 4 >> level, 1));
        assert!(dirty.is_filter_dirty());
        assert!(dirty.regions().is_level_dirty(2));

        dirty.clear();
        assert!(!dirty.is_dirty());
        assert_eq!(dirty.parameters(), ParameterDirty::empty());
    }

    quickcheck! {
        fn merge_idempotent(x: i16, y: i16, w: u8, h: u8) -> bool {
            let level = dims(128, 128, 1);
            let region = DirtyBox::new_2d(x as i32, y as i32, w as u32, h as u32);
            let once = MipmapDirtyRegion::new(region, level);
            let mut twice = once;
            twice.merge(region, level);
            once == twice
        }

        fn merge_covers_inputs(a: (u8, u8, u8, u8), b: (u8, u8, u8, u8)) -> bool {
            let level = dims(256, 256, 1);
            let boxes = [a, b];
            let mut dirty = MipmapDirtyRegion::new(DirtyBox::new_2d(a.0 as i32, a.1 as i32, a.2 as u32, a.3 as u32), level);
            dirty.merge(DirtyBox::new_2d(b.0 as i32, b.1 as i32, b.2 as u32, b.3 as u32), level);

            let inside = |x: u32, y: u32| {
                x >= dirty.x() && x < dirty.x() + dirty.width()
                    && y >= dirty.y() && y < dirty.y() + dirty.height()
            };
            boxes.iter()
                .filter(|&&(_, _, w, h)| w > 0 && h > 0)
                .all(|&(x, y, w, h)| {
                    let (x1, y1) = (x as u32 + w as u32 - 1, y as u32 + h as u32 - 1);
                    inside(x as u32, y as u32) && inside(x1.min(255), y1.min(255))
                })
                && dirty.x() + dirty.width() <= 256
                && dirty.y() + dirty.height() <= 256
        }
    }
}
