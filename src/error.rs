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

//! Crate-wide error classification.

use crate::{
    buffer::BufferError, geometry::GeometryError, program::error::ProgramError, texture::TextureError,
};
use derive_more::{Display, From};

use std::{error, io};

/// Broad category of a rejected operation.
///
/// Every failure in this crate happens before the target object is mutated, so both kinds leave
/// the object exactly as it was before the call.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The input was malformed: wrong type, wrong size, a reserved name, and so on.
    #[display(fmt = "invalid argument")]
    InvalidArgument,
    /// The input was well-formed, but the object's current configuration doesn't permit the
    /// operation.
    #[display(fmt = "invalid state")]
    InvalidState,
}

/// Any error produced by this crate.
#[derive(Debug, Display, Clone, PartialEq, From)]
pub enum Error {
    Buffer(BufferError),
    Texture(TextureError),
    Program(ProgramError),
    Geometry(GeometryError),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match *self {
            Error::Buffer(ref e) => e.kind(),
            Error::Texture(ref e) => e.kind(),
            Error::Program(ref e) => e.kind(),
            Error::Geometry(ref e) => e.kind(),
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match *self {
            Error::Buffer(ref e) => Some(e),
            Error::Texture(ref e) => Some(e),
            Error::Program(ref e) => Some(e),
            Error::Geometry(ref e) => Some(e),
        }
    }
}

impl From<Error> for io::Error {
    fn from(e: Error) -> io::Error {
        let kind = match e.kind() {
            ErrorKind::InvalidArgument => io::ErrorKind::InvalidInput,
            ErrorKind::InvalidState => io::ErrorKind::Other,
        };
        io::Error::new(kind, e)
    }
}
