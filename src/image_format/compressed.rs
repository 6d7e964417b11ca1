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

//! Block-compressed image formats.
//!
//! GPU texture formats tend to be compressed in isolated blocks of pixel data. Every format here
//! stores a 4x4 block of texels in a fixed number of bytes, so the size of an image depends only
//! on how many blocks it takes to cover it. Client data for these formats is always a byte array.
//!
//! See the [Khronos data format specification][dxt-spec] for how the blocks are laid out.
//!
//! [dxt-spec]: https://www.khronos.org/registry/DataFormat/specs/1.1/dataformat.1.1.html#S3TC

use cgmath::Vector3;

/// The block encoding used by a compressed format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockFormat {
    /// RGB or RGBA with 1-bit alpha. Also known as BC1.
    Dxt1,
    /// RGBA with explicit 4-bit alpha. Also known as BC2.
    Dxt3,
    /// RGBA with interpolated alpha. Also known as BC3.
    Dxt5,
}

impl BlockFormat {
    /// The texel dimensions of a single block.
    #[inline]
    pub fn block_dims(self) -> Vector3<u32> {
        Vector3::new(4, 4, 1)
    }

    /// The number of bytes a single block occupies.
    #[inline]
    pub fn block_bytes(self) -> usize {
        match self {
            BlockFormat::Dxt1 => 8,
            BlockFormat::Dxt3 | BlockFormat::Dxt5 => 16,
        }
    }

    /// Whether an image of the given dimensions can be stored in this format.
    ///
    /// Width and height must be multiples of the block size, except at the tail of a mipmap
    /// chain where one of them has shrunk to 1 or 2. Compressed images are always flat.
    pub fn dims_valid(self, dims: Vector3<u32>) -> bool {
        let block = self.block_dims();
        let aligned = dims.x % block.x == 0 && dims.y % block.y == 0;
        let tail = dims.x <= 2 || dims.y <= 2;
        dims.z == 1 && (aligned || tail)
    }

    /// The number of blocks required to cover an image of the given dimensions, or `None` if
    /// that count doesn't fit in a `usize`.
    pub fn blocks_for_dims(self, dims: Vector3<u32>) -> Option<usize> {
        let block = self.block_dims();
        let axis = |dim: u32, size: u32| {
            next_multiple_of(dim as usize, size as usize).map(|n| n / size as usize)
        };
        axis(dims.x, block.x)?
            .checked_mul(axis(dims.y, block.y)?)?
            .checked_mul(axis(dims.z, block.z)?)
    }
}

fn next_multiple_of(u: usize, m: usize) -> Option<usize> {
    if u == 0 {
        Some(0)
    } else {
        (u - 1).checked_add(m - ((u - 1) % m))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blocks() {
        assert_eq!(BlockFormat::Dxt1.blocks_for_dims(Vector3::new(8, 8, 1)), Some(4));
        assert_eq!(BlockFormat::Dxt5.blocks_for_dims(Vector3::new(2, 1, 1)), Some(1));
        assert_eq!(BlockFormat::Dxt3.blocks_for_dims(Vector3::new(12, 4, 1)), Some(3));
    }

    #[test]
    fn large_images() {
        assert_eq!(
            BlockFormat::Dxt1.blocks_for_dims(Vector3::new(65536, 65536, 1)),
            Some(16384 * 16384)
        );
        let max = usize::max_value();
        assert_eq!(next_multiple_of(max - 3, 4), Some(max - 3));
        assert_eq!(next_multiple_of(max, 4), None);
    }

    #[test]
    fn dims() {
        assert!(BlockFormat::Dxt1.dims_valid(Vector3::new(16, 8, 1)));
        assert!(BlockFormat::Dxt1.dims_valid(Vector3::new(6, 2, 1)));
        assert!(BlockFormat::Dxt1.dims_valid(Vector3::new(1, 1, 1)));
        assert!(!BlockFormat::Dxt1.dims_valid(Vector3::new(6, 6, 1)));
        assert!(!BlockFormat::Dxt1.dims_valid(Vector3::new(8, 8, 2)));
    }

    quickcheck! {
        fn next_multiple(u: u32, m: u8) -> bool {
            let m = m as usize % 8 + 1;
            let u = (u >> 1) as usize;
            match next_multiple_of(u, m) {
                Some(n) => n % m == 0 && n >= u && n < u + m,
                None => false,
            }
        }
    }
}
