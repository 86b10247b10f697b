use kurbo::{Point, Rect};

use crate::geometry::int_box::IntBox;
use crate::scene::structure::{ImageDimensions, VolumeType};

/// Project a target-space point (y up) onto the isometric image plane.
pub fn to_isometric(x: f64, y: f64, z: f64) -> Point {
    Point::new(x - z, (x + z - y * 6f64.sqrt()) / 2.0)
}

/// Isometric image of a set of box corners, with a running bounding rectangle.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct IsometricPolygon {
    points: Vec<Point>,
    bounds: Option<Rect>,
}

impl IsometricPolygon {
    /// Silhouette of `b` for a structure declared as `volume_type`.
    ///
    /// The plus prisms use their own six corners; every other type goes through
    /// [`IsometricPolygon::set_cuboid`].
    pub fn for_volume(b: &IntBox, volume_type: VolumeType) -> Self {
        let mut polygon = Self::default();
        match volume_type {
            VolumeType::PlusXPrism => {
                polygon.add_point(b.min.x, b.min.y, b.min.z);
                polygon.add_point(b.min.x, b.min.y, b.max.z);
                polygon.add_point(b.max.x, b.min.y, b.max.z);
                polygon.add_point(b.max.x, b.min.y, b.min.z);
                polygon.add_point(b.max.x, b.max.y, b.min.z);
                polygon.add_point(b.max.x, b.max.y, b.max.z);
            }
            VolumeType::PlusZPrism => {
                polygon.add_point(b.min.x, b.min.y, b.min.z);
                polygon.add_point(b.min.x, b.min.y, b.max.z);
                polygon.add_point(b.max.x, b.min.y, b.max.z);
                polygon.add_point(b.max.x, b.min.y, b.min.z);
                polygon.add_point(b.min.x, b.max.y, b.max.z);
                polygon.add_point(b.max.x, b.max.y, b.max.z);
            }
            _ => polygon.set_cuboid(b),
        }
        polygon
    }

    /// Replace the points with the silhouette of `b`.
    ///
    /// A box that is flat along one axis contributes the four corners of that plane. A solid
    /// box contributes the six corners of its outline; the three front corners project inside
    /// it.
    pub fn set_cuboid(&mut self, b: &IntBox) {
        *self = Self::default();
        if b.min.x == b.max.x {
            self.add_point(b.min.x, b.min.y, b.min.z);
            self.add_point(b.min.x, b.min.y, b.max.z);
            self.add_point(b.min.x, b.max.y, b.max.z);
            self.add_point(b.min.x, b.max.y, b.min.z);
        } else if b.min.y == b.max.y {
            self.add_point(b.min.x, b.min.y, b.min.z);
            self.add_point(b.max.x, b.min.y, b.min.z);
            self.add_point(b.max.x, b.min.y, b.max.z);
            self.add_point(b.min.x, b.min.y, b.max.z);
        } else if b.min.z == b.max.z {
            self.add_point(b.min.x, b.min.y, b.min.z);
            self.add_point(b.min.x, b.max.y, b.min.z);
            self.add_point(b.max.x, b.max.y, b.min.z);
            self.add_point(b.max.x, b.min.y, b.min.z);
        } else {
            self.add_point(b.min.x, b.max.y, b.min.z);
            self.add_point(b.max.x, b.max.y, b.min.z);
            self.add_point(b.max.x, b.min.y, b.min.z);
            self.add_point(b.max.x, b.min.y, b.max.z);
            self.add_point(b.min.x, b.min.y, b.max.z);
            self.add_point(b.min.x, b.max.y, b.max.z);
        }
    }

    /// Project one cartesian point and grow the bounds.
    pub fn add_point(&mut self, x: i32, y: i32, z: i32) {
        let p = to_isometric(f64::from(x), f64::from(y), f64::from(z));
        self.points.push(p);
        self.bounds = Some(match self.bounds {
            Some(r) => r.union_pt(p),
            None => Rect::from_points(p, p),
        });
    }

    /// Append all of `other`'s points.
    pub fn merge(&mut self, other: &IsometricPolygon) {
        self.points.extend_from_slice(&other.points);
        self.bounds = match (self.bounds, other.bounds) {
            (Some(a), Some(b)) => Some(a.union(b)),
            (a, b) => a.or(b),
        };
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Unrounded bounding rectangle; [`Rect::ZERO`] when empty.
    pub fn bounds(&self) -> Rect {
        self.bounds.unwrap_or(Rect::ZERO)
    }

    /// Bounding rectangle snapped outwards to whole pixels.
    pub fn pixel_bounds(&self) -> Rect {
        self.bounds().expand()
    }

    pub fn width(&self) -> u32 {
        self.pixel_bounds().width().abs() as u32
    }

    pub fn height(&self) -> u32 {
        self.pixel_bounds().height().abs() as u32
    }

    /// Final image size implied by the pixel bounds.
    pub fn image_dimensions(&self) -> ImageDimensions {
        ImageDimensions {
            width: self.width(),
            height: self.height(),
        }
    }

    /// Fractional distance from the top and bottom edges to the pixel bounds.
    pub fn vertical_excess(&self) -> (f64, f64) {
        let b = self.bounds();
        (b.y0 - b.y0.floor(), b.y1.ceil() - b.y1)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/projection/isometric.rs"]
mod tests;
