use crate::foundation::error::{IsovoxError, IsovoxResult};
use glam::{IVec3, IVec4};

/// Integer 4x4 affine transform, stored column-major (`flat = row + col * 4`).
///
/// Products are accumulated in `f64` and rounded to the nearest integer. Scene transforms
/// only ever hold translations and axis-permutation rotations (entries in `{-1, 0, 1}`),
/// so composition stays exact.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct IntAffine {
    m: [i32; 16],
}

impl Default for IntAffine {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl IntAffine {
    /// Identity transform.
    pub const IDENTITY: Self = Self {
        m: [1, 0, 0, 0, 0, 1, 0, 0, 0, 0, 1, 0, 0, 0, 0, 1],
    };

    /// All-zero matrix.
    pub const ZERO: Self = Self { m: [0; 16] };

    /// Build from four columns.
    pub const fn from_columns(c0: IVec4, c1: IVec4, c2: IVec4, c3: IVec4) -> Self {
        Self {
            m: [
                c0.x, c0.y, c0.z, c0.w, c1.x, c1.y, c1.z, c1.w, c2.x, c2.y, c2.z, c2.w, c3.x,
                c3.y, c3.z, c3.w,
            ],
        }
    }

    /// Build from row-major rows.
    pub fn from_rows(rows: [[i32; 4]; 4]) -> Self {
        let mut out = Self::ZERO;
        for (r, row) in rows.iter().enumerate() {
            for (c, v) in row.iter().enumerate() {
                out.m[r + c * 4] = *v;
            }
        }
        out
    }

    /// Translation by `t`.
    pub fn translate(t: IVec3) -> Self {
        let mut out = Self::IDENTITY;
        out.m[12] = t.x;
        out.m[13] = t.y;
        out.m[14] = t.z;
        out
    }

    /// Axis-aligned scale by `s`.
    pub fn scale(s: IVec3) -> Self {
        let mut out = Self::ZERO;
        out.m[0] = s.x;
        out.m[5] = s.y;
        out.m[10] = s.z;
        out.m[15] = 1;
        out
    }

    #[inline]
    fn at(&self, row: usize, col: usize) -> i32 {
        self.m[row + col * 4]
    }

    /// Element at `(row, col)`.
    pub fn get(&self, row: usize, col: usize) -> IsovoxResult<i32> {
        if row > 3 || col > 3 {
            return Err(IsovoxError::validation(format!(
                "matrix index ({row}, {col}) out of range"
            )));
        }
        Ok(self.at(row, col))
    }

    /// Set element at `(row, col)`.
    pub fn set(&mut self, row: usize, col: usize, value: i32) -> IsovoxResult<()> {
        if row > 3 || col > 3 {
            return Err(IsovoxError::validation(format!(
                "matrix index ({row}, {col}) out of range"
            )));
        }
        self.m[row + col * 4] = value;
        Ok(())
    }

    /// Element at column-major flat index `0..16`.
    pub fn get_flat(&self, index: usize) -> IsovoxResult<i32> {
        self.m.get(index).copied().ok_or_else(|| {
            IsovoxError::validation(format!("matrix flat index {index} out of range"))
        })
    }

    /// Set element at column-major flat index `0..16`.
    pub fn set_flat(&mut self, index: usize, value: i32) -> IsovoxResult<()> {
        let slot = self.m.get_mut(index).ok_or_else(|| {
            IsovoxError::validation(format!("matrix flat index {index} out of range"))
        })?;
        *slot = value;
        Ok(())
    }

    /// Column `index`.
    pub fn column(&self, index: usize) -> IsovoxResult<IVec4> {
        if index > 3 {
            return Err(IsovoxError::validation(format!(
                "matrix column {index} out of range"
            )));
        }
        let b = index * 4;
        Ok(IVec4::new(self.m[b], self.m[b + 1], self.m[b + 2], self.m[b + 3]))
    }

    /// Row `index`.
    pub fn row(&self, index: usize) -> IsovoxResult<IVec4> {
        if index > 3 {
            return Err(IsovoxError::validation(format!(
                "matrix row {index} out of range"
            )));
        }
        Ok(IVec4::new(
            self.m[index],
            self.m[index + 4],
            self.m[index + 8],
            self.m[index + 12],
        ))
    }

    /// Replace column `index`.
    pub fn set_column(&mut self, index: usize, column: IVec4) -> IsovoxResult<()> {
        if index > 3 {
            return Err(IsovoxError::validation(format!(
                "matrix column {index} out of range"
            )));
        }
        let b = index * 4;
        self.m[b..b + 4].copy_from_slice(&[column.x, column.y, column.z, column.w]);
        Ok(())
    }

    /// Replace row `index`.
    pub fn set_row(&mut self, index: usize, row: IVec4) -> IsovoxResult<()> {
        if index > 3 {
            return Err(IsovoxError::validation(format!(
                "matrix row {index} out of range"
            )));
        }
        self.m[index] = row.x;
        self.m[index + 4] = row.y;
        self.m[index + 8] = row.z;
        self.m[index + 12] = row.w;
        Ok(())
    }

    /// Upper 3x3 block with translation removed.
    pub fn rotation_part(&self) -> Self {
        let mut out = Self::IDENTITY;
        for col in 0..3 {
            for row in 0..3 {
                out.m[row + col * 4] = self.at(row, col);
            }
        }
        out
    }

    /// Translation column.
    pub fn translation(&self) -> IVec3 {
        IVec3::new(self.m[12], self.m[13], self.m[14])
    }

    /// Full homogeneous point transform, including the divide by `w`.
    ///
    /// A degenerate `w == 0` leaves the result undivided.
    pub fn transform_point(&self, p: IVec3) -> IVec3 {
        let (x, y, z) = (f64::from(p.x), f64::from(p.y), f64::from(p.z));
        let row = |r: usize| {
            f64::from(self.at(r, 0)) * x
                + f64::from(self.at(r, 1)) * y
                + f64::from(self.at(r, 2)) * z
                + f64::from(self.at(r, 3))
        };
        let w = row(3);
        let inv = if w == 0.0 { 1.0 } else { 1.0 / w };
        IVec3::new(
            round(row(0) * inv),
            round(row(1) * inv),
            round(row(2) * inv),
        )
    }

    /// Point transform that assumes an affine bottom row (`w == 1`).
    pub fn transform_point3x4(&self, p: IVec3) -> IVec3 {
        let (x, y, z) = (f64::from(p.x), f64::from(p.y), f64::from(p.z));
        let row = |r: usize| {
            f64::from(self.at(r, 0)) * x
                + f64::from(self.at(r, 1)) * y
                + f64::from(self.at(r, 2)) * z
                + f64::from(self.at(r, 3))
        };
        IVec3::new(round(row(0)), round(row(1)), round(row(2)))
    }

    /// Direction transform; translation is ignored.
    pub fn transform_vector(&self, v: IVec3) -> IVec3 {
        let (x, y, z) = (f64::from(v.x), f64::from(v.y), f64::from(v.z));
        let row = |r: usize| {
            f64::from(self.at(r, 0)) * x
                + f64::from(self.at(r, 1)) * y
                + f64::from(self.at(r, 2)) * z
        };
        IVec3::new(round(row(0)), round(row(1)), round(row(2)))
    }
}

impl std::ops::Mul for IntAffine {
    type Output = IntAffine;

    fn mul(self, rhs: IntAffine) -> IntAffine {
        let mut out = IntAffine::ZERO;
        for col in 0..4 {
            for row in 0..4 {
                let mut acc = 0.0f64;
                for k in 0..4 {
                    acc += f64::from(self.at(row, k)) * f64::from(rhs.at(k, col));
                }
                out.m[row + col * 4] = round(acc);
            }
        }
        out
    }
}

#[inline]
fn round(v: f64) -> i32 {
    v.round() as i32
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/affine.rs"]
mod tests;
