use crate::foundation::error::{IsovoxError, IsovoxResult};
use crate::geometry::affine::IntAffine;

/// Discrete axis-permutation rotation as packed by the voxel editor.
///
/// Bits 0-1 hold the column of row 0's nonzero entry and bits 2-3 the column of row 1's.
/// Row 2 takes the remaining column. Bits 4, 5 and 6 negate rows 0, 1 and 2.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rotation {
    rows: [[i32; 3]; 3],
}

impl Default for Rotation {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Rotation {
    /// No rotation.
    pub const IDENTITY: Self = Self {
        rows: [[1, 0, 0], [0, 1, 0], [0, 0, 1]],
    };

    /// Decode a packed rotation byte.
    pub fn from_byte(byte: u8) -> IsovoxResult<Self> {
        let c0 = usize::from(byte & 0b11);
        let c1 = usize::from((byte >> 2) & 0b11);
        if c0 > 2 || c1 > 2 || c0 == c1 {
            return Err(IsovoxError::validation(format!(
                "invalid packed rotation byte {byte:#04x}"
            )));
        }
        let c2 = 3 - c0 - c1;

        let sign = |bit: u8| if byte & (1 << bit) != 0 { -1 } else { 1 };
        let mut rows = [[0; 3]; 3];
        rows[0][c0] = sign(4);
        rows[1][c1] = sign(5);
        rows[2][c2] = sign(6);
        Ok(Self { rows })
    }

    /// Row-major 3x3 entries.
    pub fn rows(&self) -> [[i32; 3]; 3] {
        self.rows
    }

    /// Embed into a 4x4 affine transform with no translation.
    pub fn to_affine(&self) -> IntAffine {
        let r = &self.rows;
        IntAffine::from_rows([
            [r[0][0], r[0][1], r[0][2], 0],
            [r[1][0], r[1][1], r[1][2], 0],
            [r[2][0], r[2][1], r[2][2], 0],
            [0, 0, 0, 1],
        ])
    }
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/rotation.rs"]
mod tests;
