pub mod framing;
pub mod isometric;
