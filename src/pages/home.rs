use ratatui::style::{Color, Modifier, Style};

use super::{prompt_key, Page, PageId, Transition};
use crate::{
    action::GameAction,
    components::surface::{Label, Surface},
    config::PageKeyBindings,
    constants::TITLE_TEXT,
    game::session::Session,
};

pub struct HomePage {
    start_key: String,
}

impl HomePage {
    pub fn new() -> Self {
        Self { start_key: "SPACE".to_string() }
    }
}

impl Default for HomePage {
    fn default() -> Self {
        Self::new()
    }
}

impl Page for HomePage {
    fn id(&self) -> PageId {
        PageId::Home
    }

    fn register_keymap(&mut self, keymap: &PageKeyBindings) {
        self.start_key = prompt_key(keymap, GameAction::Start, "SPACE");
    }

    fn handle_action(&self, action: GameAction) -> Option<Transition> {
        match action {
            GameAction::Start => Some(Transition::Start),
            _ => None,
        }
    }

    fn draw(&self, _session: &Session, surface: &mut Surface<'_>) {
        let text = Style::default().fg(Color::Black);
        surface.label(Label::centered(200, TITLE_TEXT).style(text.add_modifier(Modifier::BOLD)));
        surface.label(Label::centered(300, format!("Press {} to Start", self.start_key)).style(text));
    }
}
