mod game;

use serde::Deserialize;
use strum::Display;

pub use crate::action::game::GameAction;

#[derive(Debug, Clone, PartialEq, Eq, Display, Deserialize)]
pub enum Action {
    Tick,
    Render,
    Resize(u16, u16),
    Suspend,
    Resume,
    Quit,
    Error(String),
    ToggleShowHelp,
    Game(GameAction),
}

impl Action {
    /// Human readable name shown in the help overlay.
    pub fn label(&self) -> String {
        match self {
            Action::Game(action) => action.to_string(),
            Action::ToggleShowHelp => "Toggle help".to_string(),
            action => action.to_string(),
        }
    }
}
