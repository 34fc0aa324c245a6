use ratatui::style::{Color, Style};

use super::{Page, PageId, Transition};
use crate::{
    action::GameAction,
    components::surface::{Label, Surface},
    game::{object::Object, session::Session},
};

#[derive(Default)]
pub struct PlayingPage;

impl Page for PlayingPage {
    fn id(&self) -> PageId {
        PageId::Playing
    }

    fn handle_action(&self, action: GameAction) -> Option<Transition> {
        match action {
            GameAction::Jump => Some(Transition::Jump),
            _ => None,
        }
    }

    fn draw(&self, session: &Session, surface: &mut Surface<'_>) {
        let bird = &session.bird;
        surface.sprite(bird.asset(), bird.bounds());
        for pipe in &session.pipes {
            surface.sprite(pipe.asset(), pipe.bounds());
        }
        surface.label(Label::at(10, 35, session.score.to_string()).style(Style::default().fg(Color::White)));
    }
}
