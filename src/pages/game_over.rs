use ratatui::style::{Color, Modifier, Style};

use super::{prompt_key, Page, PageId, Transition};
use crate::{
    action::GameAction,
    components::surface::{Label, Surface},
    config::PageKeyBindings,
    constants::GAME_OVER_TEXT,
    game::session::Session,
};

pub struct GameOverPage {
    restart_key: String,
}

impl GameOverPage {
    pub fn new() -> Self {
        Self { restart_key: "R".to_string() }
    }
}

impl Default for GameOverPage {
    fn default() -> Self {
        Self::new()
    }
}

impl Page for GameOverPage {
    fn id(&self) -> PageId {
        PageId::GameOver
    }

    fn register_keymap(&mut self, keymap: &PageKeyBindings) {
        self.restart_key = prompt_key(keymap, GameAction::Restart, "R");
    }

    fn handle_action(&self, action: GameAction) -> Option<Transition> {
        match action {
            GameAction::Restart => Some(Transition::Start),
            _ => None,
        }
    }

    fn draw(&self, session: &Session, surface: &mut Surface<'_>) {
        let text = Style::default().fg(Color::Black);
        surface.label(Label::centered(200, GAME_OVER_TEXT).style(text.add_modifier(Modifier::BOLD)));
        surface.label(Label::centered(250, format!("Score: {}", session.score)).style(text));
        surface.label(Label::centered(320, format!("Press {} to Restart", self.restart_key)).style(text));
    }
}
