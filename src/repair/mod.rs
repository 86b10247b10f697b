//! Post-render image repair: crop to the structure silhouette, bleed neighbor colors over
//! faces the renderer saw through other geometry, then scale to the final image size.

pub mod bleed;
pub mod crop;
pub mod postprocess;
