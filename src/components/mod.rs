pub mod assets;
pub mod canvas;
pub mod help;
