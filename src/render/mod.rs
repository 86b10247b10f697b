//! Hand-off to the external renderer: the Blender command line and the JSON records its
//! script and downstream consumers read.

pub mod blender;
pub mod records;
