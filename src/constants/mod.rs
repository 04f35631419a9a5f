pub mod assets;
pub mod game;

pub const TITLE: &str = "Flappy Bird";
