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

//! Program and shader errors.

use crate::{error::ErrorKind, uniform::UniformType, vertex::AttributeType};
use derive_more::Display;

use std::{error::Error, fmt, io};

/// Error returned when a program's declarations or source get rejected.
#[derive(Debug, Display, Clone, PartialEq, Eq)]
pub enum ProgramError {
    /// A uniform with the name is already attached.
    #[display(fmt = "uniform `{}` is already attached", _0)]
    DuplicateUniform(String),
    /// An attribute with the name is already bound.
    #[display(fmt = "attribute `{}` is already bound", _0)]
    DuplicateAttribute(String),
    /// Names starting with `gl` belong to built-in GLSL variables.
    #[display(fmt = "`{}` uses the reserved `gl` prefix", _0)]
    ReservedName(String),
    #[display(fmt = "attribute `{}` can't be bound to slot {}; slots start at 1 and must fit in a u32", name, slot)]
    InvalidBindingSlot { name: String, slot: u32 },
    /// One of the slots the attribute would occupy is taken by another attribute.
    #[display(fmt = "attribute `{}` overlaps a used binding slot at {}", name, slot)]
    SlotOverlap { name: String, slot: u32 },
    #[display(fmt = "uniform `{}` has length {}, but must have at least one element", name, length)]
    InvalidUniformLength { name: String, length: usize },
    /// Both shader stages were given no source.
    #[display(fmt = "vertex and fragment shaders can't both be empty")]
    EmptySource,
}

impl ProgramError {
    pub fn kind(&self) -> ErrorKind {
        match *self {
            ProgramError::DuplicateUniform(_)
            | ProgramError::DuplicateAttribute(_)
            | ProgramError::SlotOverlap { .. } => ErrorKind::InvalidState,
            ProgramError::ReservedName(_)
            | ProgramError::InvalidBindingSlot { .. }
            | ProgramError::InvalidUniformLength { .. }
            | ProgramError::EmptySource => ErrorKind::InvalidArgument,
        }
    }
}

/// Issue detected while reconciling a program's declarations with the variables a compiled shader
/// actually exposes. None of these stop the reconciliation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgramWarning {
    /// A uniform was attached, but the shader doesn't declare it. It has been detached.
    UnusedUniform(String),
    /// A uniform was attached with a different type or length than the shader declares. It has
    /// been replaced by the declared one.
    MismatchedUniform {
        name: String,
        attached: (UniformType, usize),
        declared: (UniformType, usize),
    },
    /// The shader declares a uniform that couldn't be attached.
    UnattachedUniform(String),
    /// An attribute was bound, but the shader doesn't declare it. It has been unbound.
    UnusedVertexAttribute(String),
    /// An attribute was bound with a different type than the shader declares. It has been unbound.
    MismatchedVertexAttribute {
        name: String,
        bound: AttributeType,
        declared: AttributeType,
    },
    /// The shader declares an attribute that isn't bound, and it couldn't be bound automatically.
    UnboundVertexAttribute(String),
}

impl fmt::Display for ProgramWarning {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use self::ProgramWarning::*;
        match *self {
            UnusedUniform(ref ident) => write!(f, "Unused uniform `{}`", ident),
            MismatchedUniform {
                ref name,
                attached: (attached_ty, attached_len),
                declared: (declared_ty, declared_len),
            } => write!(
                f,
                "Mismatched uniform `{}`; attached as {:?}[{}], declared as {:?}[{}]",
                name, attached_ty, attached_len, declared_ty, declared_len
            ),
            UnattachedUniform(ref ident) => write!(f, "Unattached uniform `{}`", ident),
            UnusedVertexAttribute(ref ident) => write!(f, "Unused vertex attribute `{}`", ident),
            MismatchedVertexAttribute {
                ref name,
                bound,
                declared,
            } => write!(
                f,
                "Mismatched vertex attribute `{}`; bound as {:?}, declared as {:?}",
                name, bound, declared
            ),
            UnboundVertexAttribute(ref ident) => write!(f, "Unbound vertex attribute `{}`", ident),
        }
    }
}

impl Error for ProgramError {}

impl From<ProgramError> for io::Error {
    fn from(e: ProgramError) -> io::Error {
        let kind = match e.kind() {
            ErrorKind::InvalidArgument => io::ErrorKind::InvalidInput,
            ErrorKind::InvalidState => io::ErrorKind::Other,
        };
        io::Error::new(kind, e)
    }
}
