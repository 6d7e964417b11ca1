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

//! Client-side resource model for the Ferox renderer.
//!
//! Every GPU resource is represented by a proxy with an immutable shape and mutable contents.
//! Applications fill and mutate the proxies; a render backend (a [`ResourceDriver`]) reads what
//! changed through the resource's dirty descriptor, uploads it, and clears the descriptor.
//!
//! Nothing in this crate locks. Mutation goes through `&mut self`, so callers that share resources
//! between an application thread and a render thread must provide their own synchronization.
//!
//! [`ResourceDriver`]: ./resource/trait.ResourceDriver.html

#[macro_use]
extern crate bitflags;

#[cfg(test)]
#[macro_use]
extern crate quickcheck;

pub mod buffer;
pub mod error;
pub mod geometry;
pub mod image_format;
pub mod program;
pub mod resource;
pub mod texture;
pub mod uniform;
pub mod vertex;

pub use crate::error::{Error, ErrorKind};
pub use crate::resource::{RenderDataCache, RendererId, Resource, ResourceDriver};

/// Prefix reserved for built-in GLSL symbols.
pub(crate) const RESERVED_PREFIX: &str = "gl";

mod seal {
    pub trait Sealed {}
    impl Sealed for u8 {}
    impl Sealed for u16 {}
    impl Sealed for u32 {}
    impl Sealed for i8 {}
    impl Sealed for i16 {}
    impl Sealed for i32 {}
    impl Sealed for f32 {}
}
