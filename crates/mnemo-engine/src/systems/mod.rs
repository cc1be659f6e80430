pub mod render;
pub mod palette;
pub mod rng;
