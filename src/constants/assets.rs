pub const BACKGROUND: &str = "background.png";
pub const BIRD_UP: &str = "bird_up.png";
pub const BIRD_MID: &str = "bird_mid.png";
pub const BIRD_DOWN: &str = "bird_down.png";
pub const PIPE_TOP: &str = "pipe_top.png";
pub const PIPE_BOTTOM: &str = "pipe_bottom.png";
pub const GROUND: &str = "ground.png";
pub const START: &str = "start.png";
pub const GAME_OVER: &str = "game_over.png";
