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

//! Uniform variables declared by a GLSL program.

use crate::{buffer::BufferArray, program::error::ProgramError, RESERVED_PREFIX};

/// The primitive array a uniform's value gets stored in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// An array of `f32`.
    Float,
    /// An array of `i32`. Booleans and samplers are stored as integers.
    Int,
}

/// The GLSL type of a uniform.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum UniformType {
    Float,
    FloatVec2,
    FloatVec3,
    FloatVec4,
    FloatMat2,
    FloatMat3,
    FloatMat4,

    Sampler1D,
    Sampler2D,
    Sampler3D,
    SamplerCubeMap,
    SamplerRect,
    Sampler1DShadow,
    Sampler2DShadow,
    SamplerRectShadow,

    Int,
    IntVec2,
    IntVec3,
    IntVec4,

    Bool,
    BoolVec2,
    BoolVec3,
    BoolVec4,
}

impl UniformType {
    /// The number of primitives in one element of this type.
    pub fn primitive_count(self) -> usize {
        use self::UniformType::*;
        match self {
            Float | Int | Bool => 1,
            FloatVec2 | IntVec2 | BoolVec2 => 2,
            FloatVec3 | IntVec3 | BoolVec3 => 3,
            FloatVec4 | IntVec4 | BoolVec4 | FloatMat2 => 4,
            FloatMat3 => 9,
            FloatMat4 => 16,
            Sampler1D | Sampler2D | Sampler3D | SamplerCubeMap | SamplerRect | Sampler1DShadow
            | Sampler2DShadow | SamplerRectShadow => 1,
        }
    }

    pub fn value_kind(self) -> ValueKind {
        use self::UniformType::*;
        match self {
            Float | FloatVec2 | FloatVec3 | FloatVec4 | FloatMat2 | FloatMat3 | FloatMat4 => ValueKind::Float,
            _ => ValueKind::Int,
        }
    }

    #[inline]
    pub fn is_sampler(self) -> bool {
        use self::UniformType::*;
        match self {
            Sampler1D | Sampler2D | Sampler3D | SamplerCubeMap | SamplerRect | Sampler1DShadow
            | Sampler2DShadow | SamplerRectShadow => true,
            _ => false,
        }
    }
}

/// How often a renderer should re-upload a uniform's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ValueUpdatePolicy {
    /// Only when the application asks for it.
    Manual,
    /// Once per frame.
    PerFrame,
    /// **Default value.** Every time an object using the program gets rendered.
    PerInstance,
}

impl Default for ValueUpdatePolicy {
    #[inline(always)]
    fn default() -> ValueUpdatePolicy {
        ValueUpdatePolicy::PerInstance
    }
}

/// A uniform attached to a program.
///
/// Everything but the update policy is fixed once the uniform is attached.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GlslUniform {
    name: String,
    ty: UniformType,
    length: usize,
    policy: ValueUpdatePolicy,
}

impl GlslUniform {
    pub(crate) fn new(name: String, ty: UniformType, length: usize) -> Result<GlslUniform, ProgramError> {
        if length < 1 {
            return Err(ProgramError::InvalidUniformLength { name, length });
        }
        if name.starts_with(RESERVED_PREFIX) {
            return Err(ProgramError::ReservedName(name));
        }
        Ok(GlslUniform {
            name,
            ty,
            length,
            policy: ValueUpdatePolicy::default(),
        })
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn ty(&self) -> UniformType {
        self.ty
    }

    /// The number of array elements. Non-array uniforms have a length of 1.
    #[inline]
    pub fn length(&self) -> usize {
        self.length
    }

    #[inline]
    pub fn value_update_policy(&self) -> ValueUpdatePolicy {
        self.policy
    }

    /// `None` resets the policy to [`ValueUpdatePolicy::PerInstance`].
    ///
    /// [`ValueUpdatePolicy::PerInstance`]: ./enum.ValueUpdatePolicy.html#variant.PerInstance
    pub fn set_value_update_policy(&mut self, policy: Option<ValueUpdatePolicy>) {
        self.policy = policy.unwrap_or_default();
    }

    /// Whether `value` could be uploaded to this uniform: it has the right primitive kind and
    /// holds exactly `length * primitive_count` primitives.
    pub fn is_valid_value(&self, value: &BufferArray) -> bool {
        let expected = self.length * self.ty.primitive_count();
        match (self.ty.value_kind(), value) {
            (ValueKind::Float, BufferArray::Float(v)) => v.len() == expected,
            (ValueKind::Int, BufferArray::Int(v)) => v.len() == expected,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_validation() {
        let matrices = GlslUniform::new("bones".into(), UniformType::FloatMat4, 3).unwrap();
        assert!(matrices.is_valid_value(&BufferArray::Float(vec![0.0; 48])));
        assert!(!matrices.is_valid_value(&BufferArray::Float(vec![0.0; 16])));
        assert!(!matrices.is_valid_value(&BufferArray::Int(vec![0; 48])));

        let sampler = GlslUniform::new("diffuse".into(), UniformType::Sampler2DShadow, 1).unwrap();
        assert!(sampler.is_valid_value(&BufferArray::Int(vec![3])));
        assert!(!sampler.is_valid_value(&BufferArray::UnsignedInt(vec![3])));

        let flags = GlslUniform::new("flags".into(), UniformType::BoolVec3, 2).unwrap();
        assert!(flags.is_valid_value(&BufferArray::Int(vec![1; 6])));
    }

    #[test]
    fn update_policy() {
        let mut uniform = GlslUniform::new("time".into(), UniformType::Float, 1).unwrap();
        assert_eq!(uniform.value_update_policy(), ValueUpdatePolicy::PerInstance);
        uniform.set_value_update_policy(Some(ValueUpdatePolicy::PerFrame));
        assert_eq!(uniform.value_update_policy(), ValueUpdatePolicy::PerFrame);
        uniform.set_value_update_policy(None);
        assert_eq!(uniform.value_update_policy(), ValueUpdatePolicy::PerInstance);
    }

    #[test]
    fn rejected_uniforms() {
        assert_eq!(
            GlslUniform::new("lights".into(), UniformType::FloatVec3, 0),
            Err(ProgramError::InvalidUniformLength {
                name: "lights".into(),
                length: 0
            })
        );
        assert_eq!(
            GlslUniform::new("glFoo".into(), UniformType::Float, 1),
            Err(ProgramError::ReservedName("glFoo".into()))
        );
        assert!(UniformType::SamplerCubeMap.is_sampler());
        assert_eq!(UniformType::FloatMat3.primitive_count(), 9);
    }
}
