// Game layer: the knight controller and the arena it runs in

pub mod arena;
pub mod characters;
