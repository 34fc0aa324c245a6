use serde::{Deserialize, Serialize};
use strum::Display;

use crate::{
    action::GameAction,
    components::surface::Surface,
    config::{key_event_to_string, PageKeyBindings},
    game::session::Session,
};

pub mod game_over;
pub mod home;
pub mod playing;

/// The game states. Exactly one is active; `Home` is the initial one.
#[derive(Debug, Default, Clone, Copy, Hash, Eq, PartialEq, Display, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageId {
    #[default]
    Home,
    Playing,
    GameOver,
}

/// What the controller should do in response to an input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Reset the session and enter `Playing`.
    Start,
    /// Stay in `Playing` and give the bird an upward kick.
    Jump,
}

pub trait Page {
    fn id(&self) -> PageId;

    #[allow(unused_variables)]
    fn register_keymap(&mut self, keymap: &PageKeyBindings) {}

    /// Inputs a state does not react to return `None`.
    fn handle_action(&self, action: GameAction) -> Option<Transition>;

    fn draw(&self, session: &Session, surface: &mut Surface<'_>);
}

/// Upper-cased name of a key bound to `action` for on-screen prompts,
/// preferring one without modifiers.
pub(crate) fn prompt_key(keymap: &PageKeyBindings, action: GameAction, fallback: &str) -> String {
    let keys = keymap.keys_for(action);
    keys.iter()
        .find(|key| key.modifiers.is_empty())
        .or(keys.first())
        .map(|key| key_event_to_string(key).to_uppercase())
        .unwrap_or_else(|| fallback.to_string())
}
