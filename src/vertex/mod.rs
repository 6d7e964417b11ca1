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

//! Generic vertex attributes declared by a GLSL program.

use crate::{program::error::ProgramError, RESERVED_PREFIX};

use std::ops::Range;

/// The GLSL type of a vertex attribute.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AttributeType {
    Float,
    Vec2F,
    Vec3F,
    Vec4F,
    Mat2F,
    Mat3F,
    Mat4F,
}

impl AttributeType {
    /// The number of consecutive binding slots the attribute occupies. Matrices take one slot per
    /// column.
    #[inline]
    pub fn slot_count(self) -> u32 {
        match self {
            AttributeType::Float | AttributeType::Vec2F | AttributeType::Vec3F | AttributeType::Vec4F => 1,
            AttributeType::Mat2F => 2,
            AttributeType::Mat3F => 3,
            AttributeType::Mat4F => 4,
        }
    }

    /// The number of floats in one value of this type.
    #[inline]
    pub fn primitive_count(self) -> u32 {
        match self {
            AttributeType::Float => 1,
            AttributeType::Vec2F => 2,
            AttributeType::Vec3F => 3,
            AttributeType::Vec4F | AttributeType::Mat2F => 4,
            AttributeType::Mat3F => 9,
            AttributeType::Mat4F => 16,
        }
    }
}

/// A vertex attribute bound to a fixed generic binding slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GlslVertexAttribute {
    name: String,
    ty: AttributeType,
    binding_slot: u32,
}

impl GlslVertexAttribute {
    /// Slot `0` is reserved for the built-in vertex position, so bindings start at `1`. Every slot
    /// the attribute occupies must be representable as a `u32`.
    pub(crate) fn new(
        name: String,
        ty: AttributeType,
        binding_slot: u32,
    ) -> Result<GlslVertexAttribute, ProgramError> {
        if binding_slot < 1 || binding_slot.checked_add(ty.slot_count()).is_none() {
            return Err(ProgramError::InvalidBindingSlot { name, slot: binding_slot });
        }
        if name.starts_with(RESERVED_PREFIX) {
            return Err(ProgramError::ReservedName(name));
        }
        Ok(GlslVertexAttribute {
            name,
            ty,
            binding_slot,
        })
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn ty(&self) -> AttributeType {
        self.ty
    }

    #[inline]
    pub fn binding_slot(&self) -> u32 {
        self.binding_slot
    }

    /// Every slot the attribute occupies.
    #[inline]
    pub fn slots(&self) -> Range<u32> {
        self.binding_slot..self.binding_slot + self.ty.slot_count()
    }
}
