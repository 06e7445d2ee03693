// Rusted Knight - action controller for a 2D side-scrolling knight

pub mod core;
pub mod engine;
pub mod game;
