mod game;

use serde::{Deserialize, Serialize};
use strum::Display;

pub use crate::action::game::GameAction;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Display, Deserialize)]
pub enum Action {
    /// One simulation step, tagged with the scheduler epoch that fired it.
    Tick(u64),
    /// One obstacle spawn, tagged like `Tick`.
    SpawnPipes(u64),
    Render,
    Resize(u16, u16),
    Quit,
    Error(String),
    Game(GameAction),
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_actions_parse_from_binding_names() {
        let action: Action = serde_yaml::from_str("Quit").unwrap();
        assert_eq!(action, Action::Quit);

        let action: GameAction = serde_yaml::from_str("Restart").unwrap();
        assert_eq!(action, GameAction::Restart);
    }

    #[test]
    fn test_display() {
        assert_eq!(Action::Game(GameAction::Jump).to_string(), "Game");
        assert_eq!(GameAction::Start.to_string(), "Start");
    }
}
