pub mod visibility;
pub mod world_map;
