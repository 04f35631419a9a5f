use ratatui::style::Color;

pub const WINDOW_WIDTH: i32 = 400;
pub const WINDOW_HEIGHT: i32 = 600;
pub const GROUND_HEIGHT: i32 = 100;

// Player
pub const PLAYER_WIDTH: i32 = 20;
pub const PLAYER_HEIGHT: i32 = 20;
pub const ACCELERATION: f64 = 500.0;
pub const JUMP_VELOCITY: i32 = -200;

// Ground and pipes scroll together
pub const SCROLL_SPEED: f64 = 70.0;
pub const GROUND_WIDTH_FACTOR: f64 = 1.05;
pub const GROUND_PHASES: [f64; 2] = [0.0, 1.0];
pub const GROUND_REQUEUE_PHASE: f64 = 1.0;

pub const PIPE_WIDTH: i32 = 52;
pub const PIPE_HEIGHT: i32 = 800;
pub const PIPE_GAP: i32 = 100;
pub const PIPE_MIN_DISPLACEMENT_RATIO: f64 = 0.2;
pub const PIPE_PHASES: [f64; 3] = [1.0, 1.5, 2.0];
pub const PIPE_RECYCLE_PHASE: f64 = 1.5;
pub const PIPE_RECYCLE_WIDTH_OFFSET: i32 = 1;

pub const SEED: u64 = 1;

// Menus
pub const START_GRAPHIC_WIDTH: i32 = 176;
pub const START_GRAPHIC_HEIGHT: i32 = 77;
pub const GAME_OVER_GRAPHIC_WIDTH: i32 = 192;
pub const GAME_OVER_GRAPHIC_HEIGHT: i32 = 71;
pub const GRAPHIC_Y: i32 = 100;

pub const SCORE_Y: i32 = 30;
pub const PROMPT_Y: i32 = 240;
pub const TEXT_COLOR: Color = Color::White;
pub const PROMPT_COLOR: Color = Color::Yellow;
