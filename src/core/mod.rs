// Core utilities shared by the engine and game layers

pub mod curve;
pub mod math;
pub mod rect;

pub use curve::{Curve, Keyframe};
pub use rect::Rect;
