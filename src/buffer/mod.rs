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

//! Typed, fixed-capacity primitive arrays.

use crate::{error::ErrorKind, seal::Sealed};
use derive_more::Display;
use num_traits::Zero;

use std::{error::Error, fmt::Debug};

/// The primitive element type stored in a [`BufferData`].
///
/// [`BufferData`]: ./struct.BufferData.html
#[repr(u8)]
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DataType {
    Float,
    Int,
    Short,
    Byte,
    UnsignedInt,
    UnsignedShort,
    UnsignedByte,
}

impl DataType {
    /// Size of a single element, in bytes.
    #[inline]
    pub fn byte_size(self) -> usize {
        use self::DataType::*;
        match self {
            Float | Int | UnsignedInt => 4,
            Short | UnsignedShort => 2,
            Byte | UnsignedByte => 1,
        }
    }

    #[inline]
    pub fn is_unsigned(self) -> bool {
        match self {
            DataType::UnsignedInt | DataType::UnsignedShort | DataType::UnsignedByte => true,
            _ => false,
        }
    }

    #[inline]
    pub fn is_float(self) -> bool {
        self == DataType::Float
    }
}

/// A homogeneous array of one of the supported primitive types.
///
/// The variant determines the [`DataType`] of any [`BufferData`] built from it.
///
/// [`DataType`]: ./enum.DataType.html
/// [`BufferData`]: ./struct.BufferData.html
#[derive(Debug, Clone, PartialEq)]
pub enum BufferArray {
    Float(Vec<f32>),
    Int(Vec<i32>),
    Short(Vec<i16>),
    Byte(Vec<i8>),
    UnsignedInt(Vec<u32>),
    UnsignedShort(Vec<u16>),
    UnsignedByte(Vec<u8>),
}

/// Primitive types that can be stored in a [`BufferArray`].
///
/// This trait is sealed; only `f32`, `i32`, `u32`, `i16`, `u16`, `i8`, and `u8` implement it, so
/// building a buffer out of an unsupported element type is a compile error.
///
/// [`BufferArray`]: ./enum.BufferArray.html
pub trait Primitive: Sealed + Zero + Copy + Debug + 'static {
    const DATA_TYPE: DataType;

    fn into_array(data: Vec<Self>) -> BufferArray;
    fn slice(array: &BufferArray) -> Option<&[Self]>;
    fn slice_mut(array: &mut BufferArray) -> Option<&mut [Self]>;
}

macro_rules! impl_primitive {
    ($($prim:ty => $variant:ident),+) => {$(
        impl Primitive for $prim {
            const DATA_TYPE: DataType = DataType::$variant;

            #[inline]
            fn into_array(data: Vec<$prim>) -> BufferArray {
                BufferArray::$variant(data)
            }
            #[inline]
            fn slice(array: &BufferArray) -> Option<&[$prim]> {
                match *array {
                    BufferArray::$variant(ref data) => Some(data),
                    _ => None,
                }
            }
            #[inline]
            fn slice_mut(array: &mut BufferArray) -> Option<&mut [$prim]> {
                match *array {
                    BufferArray::$variant(ref mut data) => Some(data),
                    _ => None,
                }
            }
        }

        impl From<Vec<$prim>> for BufferArray {
            #[inline]
            fn from(data: Vec<$prim>) -> BufferArray {
                BufferArray::$variant(data)
            }
        }
    )+};
}

impl_primitive! {
    f32 => Float,
    i32 => Int,
    i16 => Short,
    i8 => Byte,
    u32 => UnsignedInt,
    u16 => UnsignedShort,
    u8 => UnsignedByte
}

impl BufferArray {
    /// Create an array of `len` zeroes of the given type.
    pub fn zeroed(data_type: DataType, len: usize) -> BufferArray {
        fn zeroes<P: Primitive>(len: usize) -> BufferArray {
            P::into_array(vec![P::zero(); len])
        }

        match data_type {
            DataType::Float => zeroes::<f32>(len),
            DataType::Int => zeroes::<i32>(len),
            DataType::Short => zeroes::<i16>(len),
            DataType::Byte => zeroes::<i8>(len),
            DataType::UnsignedInt => zeroes::<u32>(len),
            DataType::UnsignedShort => zeroes::<u16>(len),
            DataType::UnsignedByte => zeroes::<u8>(len),
        }
    }

    pub fn data_type(&self) -> DataType {
        match *self {
            BufferArray::Float(_) => DataType::Float,
            BufferArray::Int(_) => DataType::Int,
            BufferArray::Short(_) => DataType::Short,
            BufferArray::Byte(_) => DataType::Byte,
            BufferArray::UnsignedInt(_) => DataType::UnsignedInt,
            BufferArray::UnsignedShort(_) => DataType::UnsignedShort,
            BufferArray::UnsignedByte(_) => DataType::UnsignedByte,
        }
    }

    pub fn len(&self) -> usize {
        match *self {
            BufferArray::Float(ref d) => d.len(),
            BufferArray::Int(ref d) => d.len(),
            BufferArray::Short(ref d) => d.len(),
            BufferArray::Byte(ref d) => d.len(),
            BufferArray::UnsignedInt(ref d) => d.len(),
            BufferArray::UnsignedShort(ref d) => d.len(),
            BufferArray::UnsignedByte(ref d) => d.len(),
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// View the array as a slice of `P`, if `P` is the array's element type.
    #[inline]
    pub fn as_slice<P: Primitive>(&self) -> Option<&[P]> {
        P::slice(self)
    }

    #[inline]
    pub fn as_mut_slice<P: Primitive>(&mut self) -> Option<&mut [P]> {
        P::slice_mut(self)
    }
}

/// Error returned when a [`BufferData`]'s contents get replaced with a mismatched array.
///
/// [`BufferData`]: ./struct.BufferData.html
#[derive(Debug, Display, Clone, PartialEq, Eq)]
pub enum BufferError {
    #[display(fmt = "buffer holds {} data, but the new array holds {}", expected, found)]
    TypeMismatch { expected: DataType, found: DataType },
    #[display(fmt = "buffer capacity is {}, but the new array has length {}", expected, found)]
    CapacityMismatch { expected: usize, found: usize },
}

impl BufferError {
    #[inline]
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::InvalidArgument
    }
}

impl Error for BufferError {}

/// A fixed-capacity, typed block of primitive data.
///
/// The type and capacity never change after creation. The backing array is optional: a buffer
/// without one describes storage whose contents are undefined on the client side, which is how
/// GPU-only ("headless") resources are modeled.
#[derive(Debug, Clone, PartialEq)]
pub struct BufferData {
    data_type: DataType,
    capacity: usize,
    data: Option<BufferArray>,
}

impl BufferData {
    /// Wrap an existing array, taking the type and capacity from it.
    ///
    /// ```
    /// use ferox::buffer::{BufferData, DataType};
    ///
    /// let buffer = BufferData::new(vec![0u16; 12]);
    /// assert_eq!(buffer.data_type(), DataType::UnsignedShort);
    /// assert_eq!(buffer.capacity(), 12);
    /// ```
    pub fn new<A: Into<BufferArray>>(data: A) -> BufferData {
        let data = data.into();
        BufferData {
            data_type: data.data_type(),
            capacity: data.len(),
            data: Some(data),
        }
    }

    /// Create a buffer with the given shape and no backing array.
    pub fn with_capacity(capacity: usize, data_type: DataType) -> BufferData {
        BufferData {
            data_type,
            capacity,
            data: None,
        }
    }

    /// Create a buffer with the given shape, filled with zeroes.
    pub fn zeroed(capacity: usize, data_type: DataType) -> BufferData {
        BufferData::new(BufferArray::zeroed(data_type, capacity))
    }

    #[inline]
    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// The number of bytes this buffer's contents occupy.
    #[inline]
    pub fn byte_size(&self) -> usize {
        self.capacity * self.data_type.byte_size()
    }

    #[inline]
    pub fn data(&self) -> Option<&BufferArray> {
        self.data.as_ref()
    }

    /// Mutable access to the backing array's elements.
    ///
    /// The array itself can't be swapped through this; use [`set_data`](#method.set_data).
    #[inline]
    pub fn as_mut_slice<P: Primitive>(&mut self) -> Option<&mut [P]> {
        self.data.as_mut().and_then(P::slice_mut)
    }

    #[inline]
    pub fn as_slice<P: Primitive>(&self) -> Option<&[P]> {
        self.data.as_ref().and_then(P::slice)
    }

    #[inline]
    pub fn is_headless(&self) -> bool {
        self.data.is_none()
    }

    /// Replace the backing array.
    ///
    /// `None` is always accepted. A new array must have the buffer's type and exactly `capacity`
    /// elements; otherwise the buffer is left untouched and an error is returned.
    pub fn set_data(&mut self, data: Option<BufferArray>) -> Result<(), BufferError> {
        if let Some(ref array) = data {
            self.check_array(array)?;
        }
        self.data = data;
        Ok(())
    }

    /// Remove and return the backing array, leaving the buffer headless.
    #[inline]
    pub fn take_data(&mut self) -> Option<BufferArray> {
        self.data.take()
    }

    pub(crate) fn check_array(&self, array: &BufferArray) -> Result<(), BufferError> {
        if array.data_type() != self.data_type {
            return Err(BufferError::TypeMismatch {
                expected: self.data_type,
                found: array.data_type(),
            });
        }
        if array.len() != self.capacity {
            return Err(BufferError::CapacityMismatch {
                expected: self.capacity,
                found: array.len(),
            });
        }
        Ok(())
    }
}

impl<P: Primitive> From<Vec<P>> for BufferData {
    #[inline]
    fn from(data: Vec<P>) -> BufferData {
        BufferData::new(P::into_array(data))
    }
}
