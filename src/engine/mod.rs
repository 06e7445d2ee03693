// Engine modules: game loop, physics, input, assets

pub mod assets;
pub mod game_loop;
pub mod input;
pub mod physics;
