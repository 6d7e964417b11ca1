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

//! Indexed geometry: per-vertex arrays, plus an index list that groups vertices into polygons.

use crate::{
    buffer::{BufferArray, BufferData, DataType},
    error::ErrorKind,
    resource::{RenderDataCache, Resource},
};
use cgmath::{Vector3, Vector4};
use derive_more::Display;
use log::trace;

use std::{
    collections::{BTreeMap, BTreeSet},
    error::Error,
    ops::RangeInclusive,
};

/// How consecutive indices form polygons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PolygonType {
    Points,
    Lines,
    Triangles,
    Quads,
    TriangleStrip,
    QuadStrip,
}

impl PolygonType {
    /// The number of complete polygons `indices` indices form. Leftover indices that don't
    /// complete a polygon are ignored.
    pub fn polygon_count(self, indices: usize) -> usize {
        match self {
            PolygonType::Points => indices,
            PolygonType::Lines => indices / 2,
            PolygonType::Triangles => indices / 3,
            PolygonType::Quads => indices / 4,
            PolygonType::TriangleStrip => indices.saturating_sub(2),
            PolygonType::QuadStrip => indices.saturating_sub(2) / 2,
        }
    }
}

/// The part of a geometry an array feeds.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArrayRole {
    #[display(fmt = "vertices")]
    Vertices,
    #[display(fmt = "normals")]
    Normals,
    #[display(fmt = "fog coordinates")]
    FogCoordinates,
    #[display(fmt = "texture coordinates for unit {}", _0)]
    TextureCoordinates(u32),
    #[display(fmt = "vertex attribute {}", _0)]
    VertexAttribute(u32),
    #[display(fmt = "indices")]
    Indices,
}

impl ArrayRole {
    /// Element sizes an array in this role may have.
    pub fn element_sizes(self) -> RangeInclusive<u8> {
        match self {
            ArrayRole::Vertices => 2..=4,
            ArrayRole::Normals => 3..=3,
            ArrayRole::FogCoordinates | ArrayRole::Indices => 1..=1,
            ArrayRole::TextureCoordinates(_) => 1..=3,
            ArrayRole::VertexAttribute(_) => 1..=4,
        }
    }

    /// Whether an array in this role may hold `data_type` primitives.
    pub fn accepts(self, data_type: DataType) -> bool {
        use crate::buffer::DataType::*;
        match self {
            ArrayRole::Vertices | ArrayRole::TextureCoordinates(_) => match data_type {
                Float | Int | Short => true,
                _ => false,
            },
            ArrayRole::Normals => match data_type {
                Float | Int | Short | Byte => true,
                _ => false,
            },
            ArrayRole::FogCoordinates => data_type.is_float(),
            ArrayRole::VertexAttribute(_) => true,
            ArrayRole::Indices => data_type.is_unsigned(),
        }
    }
}

/// Error returned when an array doesn't fit the role it's being set for.
#[derive(Debug, Display, Clone, PartialEq, Eq)]
pub enum GeometryError {
    #[display(fmt = "{} can't have an element size of {}", role, size)]
    InvalidElementSize { role: ArrayRole, size: u8 },
    #[display(fmt = "{} can't hold {} data", role, data_type)]
    InvalidDataType { role: ArrayRole, data_type: DataType },
    #[display(
        fmt = "{} has capacity {}, which isn't a multiple of the element size {}",
        role,
        capacity,
        element_size
    )]
    RaggedArray {
        role: ArrayRole,
        capacity: usize,
        element_size: u8,
    },
    /// Unit `0` is the vertex position, which is set through the vertices.
    #[display(fmt = "vertex attributes start at unit 1, not {}", _0)]
    InvalidAttributeUnit(u32),
}

impl GeometryError {
    #[inline]
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::InvalidArgument
    }
}

impl Error for GeometryError {}

/// A buffer read as consecutive vectors of `element_size` primitives.
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryArray {
    data: BufferData,
    element_size: u8,
}

impl GeometryArray {
    fn new(role: ArrayRole, data: BufferData, element_size: u8) -> Result<GeometryArray, GeometryError> {
        if !role.element_sizes().contains(&element_size) {
            return Err(GeometryError::InvalidElementSize {
                role,
                size: element_size,
            });
        }
        if !role.accepts(data.data_type()) {
            return Err(GeometryError::InvalidDataType {
                role,
                data_type: data.data_type(),
            });
        }
        if data.capacity() % element_size as usize != 0 {
            return Err(GeometryError::RaggedArray {
                role,
                capacity: data.capacity(),
                element_size,
            });
        }
        Ok(GeometryArray { data, element_size })
    }

    #[inline]
    pub fn data(&self) -> &BufferData {
        &self.data
    }

    #[inline]
    pub fn data_type(&self) -> DataType {
        self.data.data_type()
    }

    /// Primitives per element.
    #[inline]
    pub fn element_size(&self) -> u8 {
        self.element_size
    }

    #[inline]
    pub fn element_count(&self) -> usize {
        self.data.capacity() / self.element_size as usize
    }

    /// Component `component` of element `index`, converted to a float. `None` if the buffer is
    /// headless or either index is out of range.
    pub fn component(&self, index: usize, component: u8) -> Option<f32> {
        if index >= self.element_count() || component >= self.element_size {
            return None;
        }
        let i = index * self.element_size as usize + component as usize;
        match *self.data.data()? {
            BufferArray::Float(ref v) => v.get(i).cloned(),
            BufferArray::Int(ref v) => v.get(i).map(|&p| p as f32),
            BufferArray::Short(ref v) => v.get(i).map(|&p| p as f32),
            BufferArray::Byte(ref v) => v.get(i).map(|&p| p as f32),
            BufferArray::UnsignedInt(ref v) => v.get(i).map(|&p| p as f32),
            BufferArray::UnsignedShort(ref v) => v.get(i).map(|&p| p as f32),
            BufferArray::UnsignedByte(ref v) => v.get(i).map(|&p| p as f32),
        }
    }
}

bitflags! {
    /// Arrays of a geometry that changed since the last upload.
    #[derive(Default)]
    pub struct GeometryDirty: u8 {
        const VERTICES = 1 << 0;
        const NORMALS = 1 << 1;
        const FOG_COORDINATES = 1 << 2;
        const TEXTURE_COORDINATES = 1 << 3;
        const VERTEX_ATTRIBUTES = 1 << 4;
        /// The indices or the polygon type changed.
        const INDICES = 1 << 5;
    }
}

/// Everything about a geometry that changed since a renderer last cleared the descriptor.
///
/// Units whose arrays were removed stay listed, so the renderer knows to disable them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeometryDirtyDescriptor {
    flags: GeometryDirty,
    texture_units: BTreeSet<u32>,
    attribute_units: BTreeSet<u32>,
}

impl GeometryDirtyDescriptor {
    #[inline]
    pub fn flags(&self) -> GeometryDirty {
        self.flags
    }

    #[inline]
    pub fn is_dirty(&self) -> bool {
        !self.flags.is_empty()
    }

    pub fn is_role_dirty(&self, role: ArrayRole) -> bool {
        match role {
            ArrayRole::TextureCoordinates(unit) => self.texture_units.contains(&unit),
            ArrayRole::VertexAttribute(unit) => self.attribute_units.contains(&unit),
            _ => self.flags.contains(GeometryDirty::from(role)),
        }
    }

    pub fn dirty_texture_units<'a>(&'a self) -> impl 'a + Iterator<Item = u32> {
        self.texture_units.iter().cloned()
    }

    pub fn dirty_attribute_units<'a>(&'a self) -> impl 'a + Iterator<Item = u32> {
        self.attribute_units.iter().cloned()
    }

    fn flag(&mut self, role: ArrayRole) {
        match role {
            ArrayRole::TextureCoordinates(unit) => {
                self.texture_units.insert(unit);
            }
            ArrayRole::VertexAttribute(unit) => {
                self.attribute_units.insert(unit);
            }
            _ => (),
        }
        self.flags.insert(GeometryDirty::from(role));
    }
}

impl From<ArrayRole> for GeometryDirty {
    fn from(role: ArrayRole) -> GeometryDirty {
        match role {
            ArrayRole::Vertices => GeometryDirty::VERTICES,
            ArrayRole::Normals => GeometryDirty::NORMALS,
            ArrayRole::FogCoordinates => GeometryDirty::FOG_COORDINATES,
            ArrayRole::TextureCoordinates(_) => GeometryDirty::TEXTURE_COORDINATES,
            ArrayRole::VertexAttribute(_) => GeometryDirty::VERTEX_ATTRIBUTES,
            ArrayRole::Indices => GeometryDirty::INDICES,
        }
    }
}

/// Vertices and their per-vertex data, along with the indices that assemble them into polygons.
///
/// Element counts aren't checked against each other, since arrays get replaced one at a time and
/// may be briefly inconsistent. Renderers should check them when uploading.
///
/// ```
/// use ferox::buffer::BufferData;
/// use ferox::geometry::{IndexedGeometry, PolygonType};
///
/// let vertices = BufferData::new(vec![0.0f32, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0]);
/// let indices = BufferData::new(vec![0u16, 1, 2]);
/// let geometry = IndexedGeometry::new(vertices, 3, indices, PolygonType::Triangles).unwrap();
/// assert_eq!(geometry.vertex_count(), 3);
/// assert_eq!(geometry.polygon_count(), 1);
/// ```
#[derive(Debug)]
pub struct IndexedGeometry {
    vertices: GeometryArray,
    normals: Option<GeometryArray>,
    fog_coordinates: Option<GeometryArray>,
    texture_coordinates: BTreeMap<u32, GeometryArray>,
    vertex_attributes: BTreeMap<u32, GeometryArray>,
    indices: GeometryArray,
    polygon_type: PolygonType,
    dirty: GeometryDirtyDescriptor,
    render_data: RenderDataCache,
}

impl IndexedGeometry {
    /// Vertices need 2 to 4 float, int, or short components per element. A fourth component is
    /// the homogeneous coordinate. Indices must be unsigned.
    pub fn new(
        vertices: BufferData,
        vertex_element_size: u8,
        indices: BufferData,
        polygon_type: PolygonType,
    ) -> Result<IndexedGeometry, GeometryError> {
        let vertices = GeometryArray::new(ArrayRole::Vertices, vertices, vertex_element_size)?;
        let indices = GeometryArray::new(ArrayRole::Indices, indices, 1)?;
        Ok(IndexedGeometry {
            vertices,
            normals: None,
            fog_coordinates: None,
            texture_coordinates: BTreeMap::new(),
            vertex_attributes: BTreeMap::new(),
            indices,
            polygon_type,
            dirty: GeometryDirtyDescriptor {
                flags: GeometryDirty::VERTICES | GeometryDirty::INDICES,
                ..GeometryDirtyDescriptor::default()
            },
            render_data: RenderDataCache::new(),
        })
    }

    #[inline]
    pub fn vertices(&self) -> &GeometryArray {
        &self.vertices
    }

    pub fn set_vertices(&mut self, vertices: BufferData, element_size: u8) -> Result<(), GeometryError> {
        self.vertices = GeometryArray::new(ArrayRole::Vertices, vertices, element_size)?;
        trace!("set {} vertices of size {}", self.vertices.element_count(), element_size);
        self.dirty.flag(ArrayRole::Vertices);
        Ok(())
    }

    #[inline]
    pub fn normals(&self) -> Option<&GeometryArray> {
        self.normals.as_ref()
    }

    /// Normals have three components and are assumed to be normalized. `None` removes them.
    pub fn set_normals(&mut self, normals: Option<BufferData>) -> Result<(), GeometryError> {
        self.normals = match normals {
            Some(data) => Some(GeometryArray::new(ArrayRole::Normals, data, 3)?),
            None => None,
        };
        self.dirty.flag(ArrayRole::Normals);
        Ok(())
    }

    #[inline]
    pub fn fog_coordinates(&self) -> Option<&GeometryArray> {
        self.fog_coordinates.as_ref()
    }

    pub fn set_fog_coordinates(&mut self, fog: Option<BufferData>) -> Result<(), GeometryError> {
        self.fog_coordinates = match fog {
            Some(data) => Some(GeometryArray::new(ArrayRole::FogCoordinates, data, 1)?),
            None => None,
        };
        self.dirty.flag(ArrayRole::FogCoordinates);
        Ok(())
    }

    #[inline]
    pub fn texture_coordinates(&self, unit: u32) -> Option<&GeometryArray> {
        self.texture_coordinates.get(&unit)
    }

    /// Every texture unit with coordinates, in ascending order.
    pub fn texture_coordinate_units<'a>(&'a self) -> impl 'a + Iterator<Item = (u32, &'a GeometryArray)> {
        self.texture_coordinates.iter().map(|(&unit, array)| (unit, array))
    }

    /// Texture coordinates have 1 to 3 components. `None` removes the unit's coordinates.
    pub fn set_texture_coordinates(
        &mut self,
        unit: u32,
        coordinates: Option<(BufferData, u8)>,
    ) -> Result<(), GeometryError> {
        let role = ArrayRole::TextureCoordinates(unit);
        match coordinates {
            Some((data, element_size)) => {
                let array = GeometryArray::new(role, data, element_size)?;
                self.texture_coordinates.insert(unit, array);
            }
            None => {
                self.texture_coordinates.remove(&unit);
            }
        }
        self.dirty.flag(role);
        Ok(())
    }

    #[inline]
    pub fn vertex_attributes(&self, unit: u32) -> Option<&GeometryArray> {
        self.vertex_attributes.get(&unit)
    }

    /// Every attribute unit with data, in ascending order.
    pub fn vertex_attribute_units<'a>(&'a self) -> impl 'a + Iterator<Item = (u32, &'a GeometryArray)> {
        self.vertex_attributes.iter().map(|(&unit, array)| (unit, array))
    }

    /// Units match the binding slots of a program's vertex attributes, so they start at `1`. A
    /// matrix attribute takes one unit per column, in consecutive units. `None` removes the unit's
    /// data.
    pub fn set_vertex_attributes(&mut self, unit: u32, data: Option<(BufferData, u8)>) -> Result<(), GeometryError> {
        if unit < 1 {
            return Err(GeometryError::InvalidAttributeUnit(unit));
        }
        let role = ArrayRole::VertexAttribute(unit);
        match data {
            Some((data, element_size)) => {
                let array = GeometryArray::new(role, data, element_size)?;
                self.vertex_attributes.insert(unit, array);
            }
            None => {
                self.vertex_attributes.remove(&unit);
            }
        }
        self.dirty.flag(role);
        Ok(())
    }

    #[inline]
    pub fn indices(&self) -> &GeometryArray {
        &self.indices
    }

    pub fn set_indices(&mut self, indices: BufferData, polygon_type: PolygonType) -> Result<(), GeometryError> {
        self.indices = GeometryArray::new(ArrayRole::Indices, indices, 1)?;
        self.polygon_type = polygon_type;
        trace!("set {} indices as {:?}", self.indices.element_count(), polygon_type);
        self.dirty.flag(ArrayRole::Indices);
        Ok(())
    }

    /// Mutable access to the buffer behind `role`, flagging it dirty. `None` if the geometry has no
    /// array in that role.
    ///
    /// A buffer's type and capacity are fixed, so edits made through this can't invalidate the
    /// array.
    pub fn data_mut(&mut self, role: ArrayRole) -> Option<&mut BufferData> {
        let array = match role {
            ArrayRole::Vertices => Some(&mut self.vertices),
            ArrayRole::Normals => self.normals.as_mut(),
            ArrayRole::FogCoordinates => self.fog_coordinates.as_mut(),
            ArrayRole::TextureCoordinates(unit) => self.texture_coordinates.get_mut(&unit),
            ArrayRole::VertexAttribute(unit) => self.vertex_attributes.get_mut(&unit),
            ArrayRole::Indices => Some(&mut self.indices),
        }?;
        self.dirty.flag(role);
        Some(&mut array.data)
    }

    #[inline]
    pub fn polygon_type(&self) -> PolygonType {
        self.polygon_type
    }

    #[inline]
    pub fn polygon_count(&self) -> usize {
        self.polygon_type.polygon_count(self.index_count())
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.element_count()
    }

    #[inline]
    pub fn index_count(&self) -> usize {
        self.indices.element_count()
    }

    /// The vertex at `index`. Missing components default to `z = 0` and `w = 1`. `None` if the
    /// vertices are headless or `index` is out of range.
    pub fn vertex(&self, index: usize) -> Option<Vector4<f32>> {
        let component = |c, default| {
            if c < self.vertices.element_size {
                self.vertices.component(index, c)
            } else {
                Some(default)
            }
        };
        Some(Vector4::new(
            component(0, 0.0)?,
            component(1, 0.0)?,
            component(2, 0.0)?,
            component(3, 1.0)?,
        ))
    }

    /// The minimum and maximum corners of the axis-aligned box around every vertex, after the
    /// homogeneous divide. `None` if there are no vertices or they're headless.
    pub fn bounds(&self) -> Option<(Vector3<f32>, Vector3<f32>)> {
        let mut bounds: Option<(Vector3<f32>, Vector3<f32>)> = None;
        for index in 0..self.vertex_count() {
            let v = self.vertex(index)?;
            let p = v.truncate() / v.w;
            bounds = Some(match bounds {
                None => (p, p),
                Some((min, max)) => (
                    Vector3::new(min.x.min(p.x), min.y.min(p.y), min.z.min(p.z)),
                    Vector3::new(max.x.max(p.x), max.y.max(p.y), max.z.max(p.z)),
                ),
            });
        }
        bounds
    }
}

impl Resource for IndexedGeometry {
    type DirtyDescriptor = GeometryDirtyDescriptor;

    #[inline]
    fn dirty_descriptor(&self) -> &GeometryDirtyDescriptor {
        &self.dirty
    }

    fn clear_dirty_descriptor(&mut self) {
        self.dirty = GeometryDirtyDescriptor::default();
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

    fn quad() -> IndexedGeometry {
        let vertices = BufferData::new(vec![0.0f32, 0.0, 2.0, 0.0, 2.0, 2.0, 0.0, 2.0]);
        let indices = BufferData::new(vec![0u8, 1, 2, 0, 2, 3]);
        let mut geometry = IndexedGeometry::new(vertices, 2, indices, PolygonType::Triangles).unwrap();
        geometry.clear_dirty_descriptor();
        geometry
    }

    #[test]
    fn polygon_counts() {
        assert_eq!(PolygonType::Points.polygon_count(5), 5);
        assert_eq!(PolygonType::Lines.polygon_count(5), 2);
        assert_eq!(PolygonType::Triangles.polygon_count(7), 2);
        assert_eq!(PolygonType::Quads.polygon_count(8), 2);
        assert_eq!(PolygonType::TriangleStrip.polygon_count(5), 3);
        assert_eq!(PolygonType::QuadStrip.polygon_count(6), 2);
        assert_eq!(PolygonType::TriangleStrip.polygon_count(1), 0);
        assert_eq!(PolygonType::QuadStrip.polygon_count(0), 0);
    }

    #[test]
    fn counts_and_element_sizes() {
        let geometry = quad();
        assert_eq!(geometry.vertex_count(), 4);
        assert_eq!(geometry.vertices().element_size(), 2);
        assert_eq!(geometry.index_count(), 6);
        assert_eq!(geometry.indices().data_type(), DataType::UnsignedByte);
        assert_eq!(geometry.polygon_count(), 2);
        assert!(geometry.normals().is_none());
    }

    #[test]
    fn arrays_are_validated() {
        let mut geometry = quad();
        assert_eq!(
            geometry.set_vertices(BufferData::new(vec![0.0f32; 6]), 1),
            Err(GeometryError::InvalidElementSize {
                role: ArrayRole::Vertices,
                size: 1
            })
        );
        assert_eq!(
            geometry.set_vertices(BufferData::new(vec![0u32; 6]), 3),
            Err(GeometryError::InvalidDataType {
                role: ArrayRole::Vertices,
                data_type: DataType::UnsignedInt
            })
        );
        assert_eq!(
            geometry.set_normals(Some(BufferData::new(vec![0.0f32; 7]))),
            Err(GeometryError::RaggedArray {
                role: ArrayRole::Normals,
                capacity: 7,
                element_size: 3
            })
        );
        assert!(geometry.set_fog_coordinates(Some(BufferData::new(vec![0i32; 4]))).is_err());
        assert!(geometry
            .set_texture_coordinates(0, Some((BufferData::new(vec![0.0f32; 8]), 4)))
            .is_err());
        assert_eq!(
            geometry.set_indices(BufferData::new(vec![0i32; 3]), PolygonType::Triangles),
            Err(GeometryError::InvalidDataType {
                role: ArrayRole::Indices,
                data_type: DataType::Int
            })
        );

        let err = geometry
            .set_vertex_attributes(0, Some((BufferData::new(vec![0.0f32; 4]), 1)))
            .unwrap_err();
        assert_eq!(err, GeometryError::InvalidAttributeUnit(0));
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);

        assert_eq!(geometry.vertex_count(), 4);
        assert_eq!(geometry.polygon_type(), PolygonType::Triangles);
        assert!(!geometry.dirty_descriptor().is_dirty());
    }

    #[test]
    fn vertex_components() {
        let mut geometry = quad();
        assert_eq!(geometry.vertex(2), Some(Vector4::new(2.0, 2.0, 0.0, 1.0)));
        assert_eq!(geometry.vertex(4), None);

        geometry
            .set_vertices(BufferData::new(vec![1i16, 2, 3, 4, 5, 6]), 3)
            .unwrap();
        assert_eq!(geometry.vertex(1), Some(Vector4::new(4.0, 5.0, 6.0, 1.0)));

        geometry
            .set_vertices(BufferData::with_capacity(6, DataType::Float), 3)
            .unwrap();
        assert_eq!(geometry.vertex_count(), 2);
        assert_eq!(geometry.vertex(0), None);
        assert_eq!(geometry.bounds(), None);
    }

    #[test]
    fn bounds_divide_by_w() {
        let vertices = BufferData::new(vec![2.0f32, 4.0, -6.0, 2.0, -1.0, 0.0, 1.0, 1.0]);
        let geometry = IndexedGeometry::new(vertices, 4, BufferData::new(vec![0u32, 1]), PolygonType::Lines).unwrap();
        assert_eq!(
            geometry.bounds(),
            Some((Vector3::new(-1.0, 0.0, -3.0), Vector3::new(1.0, 2.0, 1.0)))
        );
        assert_eq!(geometry.polygon_count(), 1);
    }

    #[test]
    fn dirty_tracking() {
        let mut geometry = quad();

        geometry
            .set_texture_coordinates(2, Some((BufferData::new(vec![0.0f32; 8]), 2)))
            .unwrap();
        geometry
            .set_vertex_attributes(3, Some((BufferData::new(vec![0u8; 16]), 4)))
            .unwrap();
        geometry.set_vertex_attributes(5, None).unwrap();
        let dirty = geometry.dirty_descriptor();
        assert_eq!(
            dirty.flags(),
            GeometryDirty::TEXTURE_COORDINATES | GeometryDirty::VERTEX_ATTRIBUTES
        );
        assert!(dirty.is_role_dirty(ArrayRole::TextureCoordinates(2)));
        assert!(!dirty.is_role_dirty(ArrayRole::TextureCoordinates(0)));
        assert_eq!(dirty.dirty_attribute_units().collect::<Vec<_>>(), vec![3, 5]);
        assert!(!dirty.is_role_dirty(ArrayRole::Vertices));

        assert_eq!(
            geometry.texture_coordinate_units().map(|(u, _)| u).collect::<Vec<_>>(),
            vec![2]
        );
        assert_eq!(geometry.vertex_attributes(3).map(|a| a.element_count()), Some(4));

        geometry.clear_dirty_descriptor();
        assert!(geometry.data_mut(ArrayRole::Normals).is_none());
        assert!(!geometry.dirty_descriptor().is_dirty());

        geometry.data_mut(ArrayRole::Vertices).unwrap().as_mut_slice::<f32>().unwrap()[0] = 9.0;
        assert!(geometry.dirty_descriptor().is_role_dirty(ArrayRole::Vertices));
        assert_eq!(geometry.vertex(0).map(|v| v.x), Some(9.0));
    }

    #[test]
    fn new_geometry_is_dirty() {
        let geometry = IndexedGeometry::new(
            BufferData::new(vec![0.0f32; 3]),
            3,
            BufferData::new(vec![0u16]),
            PolygonType::Points,
        )
        .unwrap();
        assert_eq!(
            geometry.dirty_descriptor().flags(),
            GeometryDirty::VERTICES | GeometryDirty::INDICES
        );
    }

    quickcheck! {
        fn polygons_never_exceed_indices(indices: usize) -> bool {
            [
                PolygonType::Points,
                PolygonType::Lines,
                PolygonType::Triangles,
                PolygonType::Quads,
                PolygonType::TriangleStrip,
                PolygonType::QuadStrip,
            ]
            .iter()
            .all(|ty| ty.polygon_count(indices) <= indices)
        }
    }
}
