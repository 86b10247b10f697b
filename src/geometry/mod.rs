pub mod affine;
pub mod direction;
pub mod int_box;
pub mod rotation;
