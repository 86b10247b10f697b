pub mod flatten;
pub mod graph;
pub mod structure;
