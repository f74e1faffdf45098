//! Fixed-point matrices
//!
//! The coprocessor consumes 4x4 matrices in s15.16 fixed point. Each column
//! stores the four integer halves followed by the four fraction halves, which
//! is the layout it loads with a single DMA.

use bytemuck::{Pod, Zeroable};
use glam::Mat4;
use serde::{Deserialize, Serialize};

/// One s15.16 column: integer halves then fraction halves
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Pod, Zeroable, Serialize, Deserialize)]
pub struct FixedColumn {
    pub int: [i16; 4],
    pub frac: [u16; 4],
}

/// Column-major s15.16 fixed-point 4x4 matrix (64 bytes)
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Pod, Zeroable, Serialize, Deserialize)]
pub struct FixedMat4 {
    pub cols: [FixedColumn; 4],
}

const FIXED_ONE: f32 = 65536.0;

/// Float to raw s15.16. `as` saturates out-of-range values and maps NaN to 0.
#[inline]
fn to_raw(value: f32) -> i32 {
    (value * FIXED_ONE) as i32
}

#[inline]
fn from_raw(raw: i32) -> f32 {
    raw as f32 / FIXED_ONE
}

impl FixedMat4 {
    pub const IDENTITY: FixedMat4 = FixedMat4 {
        cols: [
            FixedColumn {
                int: [1, 0, 0, 0],
                frac: [0; 4],
            },
            FixedColumn {
                int: [0, 1, 0, 0],
                frac: [0; 4],
            },
            FixedColumn {
                int: [0, 0, 1, 0],
                frac: [0; 4],
            },
            FixedColumn {
                int: [0, 0, 0, 1],
                frac: [0; 4],
            },
        ],
    };

    /// Raw s15.16 value at (column, row)
    #[inline]
    pub fn raw(&self, col: usize, row: usize) -> i32 {
        let column = &self.cols[col];
        ((column.int[row] as i32) << 16) | column.frac[row] as i32
    }

    #[inline]
    fn set_raw(&mut self, col: usize, row: usize, raw: i32) {
        self.cols[col].int[row] = (raw >> 16) as i16;
        self.cols[col].frac[row] = (raw & 0xFFFF) as u16;
    }

    /// Encode a float matrix. Values outside ±32768 saturate.
    pub fn from_mat4(matrix: &Mat4) -> Self {
        let mut fixed = FixedMat4::default();
        let values = matrix.to_cols_array_2d();
        for (col, column) in values.iter().enumerate() {
            for (row, value) in column.iter().enumerate() {
                fixed.set_raw(col, row, to_raw(*value));
            }
        }
        fixed
    }

    /// Decode back to floats
    pub fn to_mat4(&self) -> Mat4 {
        let mut values = [[0.0f32; 4]; 4];
        for (col, column) in values.iter_mut().enumerate() {
            for (row, value) in column.iter_mut().enumerate() {
                *value = from_raw(self.raw(col, row));
            }
        }
        Mat4::from_cols_array_2d(&values)
    }

    /// Fixed-point product `self * rhs` with 64-bit intermediates
    pub fn multiply(&self, rhs: &FixedMat4) -> FixedMat4 {
        let mut out = FixedMat4::default();
        for col in 0..4 {
            for row in 0..4 {
                let sum: i64 = (0..4)
                    .map(|k| self.raw(k, row) as i64 * rhs.raw(col, k) as i64)
                    .sum();
                let raw = (sum >> 16).clamp(i32::MIN as i64, i32::MAX as i64) as i32;
                out.set_raw(col, row, raw);
            }
        }
        out
    }

    /// Bytes as the coprocessor loads them
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }
}
