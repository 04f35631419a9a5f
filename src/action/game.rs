use serde::Deserialize;
use strum::Display;

/// Inputs understood by the game stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Deserialize)]
pub enum GameAction {
    Begin,
    Jump,
    Restart,
}
