use serde::{Deserialize, Serialize};
use strum::Display;

/// Logical game inputs. Which one a key produces depends on the active state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, Deserialize)]
pub enum GameAction {
    Start,
    Jump,
    Restart,
}
