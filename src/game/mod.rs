pub mod bird;
pub mod object;
pub mod pipe;
pub mod session;
pub mod spawner;

use tokio::sync::mpsc::UnboundedSender;
use tracing::{info, trace};

use crate::{
    action::{Action, GameAction},
    assets::{AssetId, AssetStore},
    audio::AudioService,
    components::surface::Surface,
    config::KeyBindings,
    constants::{BOARD_HEIGHT, BOARD_WIDTH},
    game::{object::Bounds, session::Session, spawner::Spawner},
    pages::{game_over::GameOverPage, home::HomePage, playing::PlayingPage, Page, PageId, Transition},
    scheduler::Scheduler,
};

/// The game flow state machine. Owns the session, the two periodic drivers
/// and the music, and switches between Home, Playing and GameOver.
pub struct Game {
    state: PageId,
    session: Session,
    spawner: Spawner,
    scheduler: Scheduler,
    audio: Box<dyn AudioService>,
    track: String,
    home: HomePage,
    playing: PlayingPage,
    game_over: GameOverPage,
}

impl Game {
    pub fn new(
        tx: UnboundedSender<Action>,
        audio: Box<dyn AudioService>,
        track: String,
        keybindings: &KeyBindings,
        seed: Option<u64>,
    ) -> Self {
        let mut game = Self {
            state: PageId::Home,
            session: Session::new(),
            spawner: Spawner::from_seed(seed),
            scheduler: Scheduler::new(tx),
            audio,
            track,
            home: HomePage::new(),
            playing: PlayingPage,
            game_over: GameOverPage::new(),
        };
        for page in [PageId::Home, PageId::Playing, PageId::GameOver] {
            let keymap = keybindings.page(page);
            game.page_mut(page).register_keymap(&keymap);
        }
        game
    }

    pub fn state(&self) -> PageId {
        self.state
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    fn page(&self) -> &dyn Page {
        match self.state {
            PageId::Home => &self.home,
            PageId::Playing => &self.playing,
            PageId::GameOver => &self.game_over,
        }
    }

    fn page_mut(&mut self, id: PageId) -> &mut dyn Page {
        match id {
            PageId::Home => &mut self.home,
            PageId::Playing => &mut self.playing,
            PageId::GameOver => &mut self.game_over,
        }
    }

    /// Returns whether the screen needs a redraw.
    pub fn handle_action(&mut self, action: GameAction) -> bool {
        match self.page().handle_action(action) {
            Some(Transition::Start) => {
                self.start();
                true
            },
            Some(Transition::Jump) => {
                self.session.jump();
                false
            },
            None => {
                trace!("Ignoring {action} in {}", self.page().id());
                false
            },
        }
    }

    fn start(&mut self) {
        self.session.reset();
        self.state = PageId::Playing;
        self.scheduler.start();
        self.audio.play(&self.track, true);
        info!("Game started (epoch {})", self.scheduler.epoch());
    }

    fn finish(&mut self) {
        self.scheduler.stop();
        self.state = PageId::GameOver;
        self.audio.stop();
        info!("Game over, score {}", self.session.score.value());
    }

    /// Runs one simulation step. Returns whether the screen needs a redraw;
    /// stale ticks are dropped.
    pub fn on_tick(&mut self, epoch: u64) -> bool {
        if self.state != PageId::Playing || !self.scheduler.is_current(epoch) {
            return false;
        }
        self.session.step();
        if self.session.game_over {
            self.finish();
        }
        true
    }

    pub fn on_spawn(&mut self, epoch: u64) {
        if self.state != PageId::Playing || !self.scheduler.is_current(epoch) {
            return;
        }
        self.spawner.spawn(&mut self.session.pipes);
        trace!("Spawned pipes, {} on board", self.session.pipes.len());
    }

    /// Builds the frame for the current state.
    pub fn surface<'a>(&self, assets: &'a AssetStore) -> Surface<'a> {
        let mut surface = Surface::new(assets);
        surface.sprite(AssetId::Background, Bounds::new(0, 0, BOARD_WIDTH, BOARD_HEIGHT));
        self.page().draw(&self.session, &mut surface);
        surface
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use pretty_assertions::assert_eq;
    use ratatui::{buffer::Buffer, layout::Rect, style::Color, widgets::Widget};
    use tokio::sync::mpsc::{self, UnboundedReceiver};

    use super::*;
    use crate::{
        config::Config,
        constants::game::{BIRD_Y, JUMP_VELOCITY},
        game::{
            object::Object,
            pipe::{Pipe, PipeKind},
        },
    };

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Play(String, bool),
        Stop,
    }

    #[derive(Clone, Default)]
    struct RecordingAudio(Rc<RefCell<Vec<Call>>>);

    impl AudioService for RecordingAudio {
        fn play(&mut self, track: &str, looping: bool) {
            self.0.borrow_mut().push(Call::Play(track.to_string(), looping));
        }

        fn stop(&mut self) {
            self.0.borrow_mut().push(Call::Stop);
        }
    }

    fn new_game() -> (Game, RecordingAudio, UnboundedReceiver<Action>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let audio = RecordingAudio::default();
        let keybindings = Config::builtin().unwrap().keybindings;
        let game = Game::new(tx, Box::new(audio.clone()), "bgmusic.wav".to_string(), &keybindings, Some(1));
        (game, audio, rx)
    }

    fn play_until_over(game: &mut Game) -> u32 {
        let epoch = game.scheduler().epoch();
        let mut ticks = 0;
        while game.state() == PageId::Playing {
            assert!(game.on_tick(epoch));
            ticks += 1;
            assert!(ticks < 1000);
        }
        ticks
    }

    fn render(game: &Game) -> String {
        let assets = AssetStore::load(None).unwrap();
        let area = Rect::new(0, 0, 90, 80);
        let mut buf = Buffer::empty(area);
        game.surface(&assets).render(area, &mut buf);
        (0..area.height)
            .map(|row| (0..area.width).map(|col| buf.cell((col, row)).unwrap().symbol().to_string()).collect())
            .collect::<Vec<String>>()
            .join("\n")
    }

    #[tokio::test]
    async fn test_starts_at_home() {
        let (game, audio, _rx) = new_game();
        assert_eq!(game.state(), PageId::Home);
        assert!(!game.scheduler().is_running());
        assert!(audio.0.borrow().is_empty());
        assert!(render(&game).contains("Press SPACE to Start"));
    }

    #[tokio::test]
    async fn test_home_ignores_everything_but_start() {
        let (mut game, _audio, _rx) = new_game();
        assert!(!game.handle_action(GameAction::Jump));
        assert!(!game.handle_action(GameAction::Restart));
        assert_eq!(game.state(), PageId::Home);

        assert!(game.handle_action(GameAction::Start));
        assert_eq!(game.state(), PageId::Playing);
        assert!(game.scheduler().is_running());
    }

    #[tokio::test]
    async fn test_start_plays_music_and_resets() {
        let (mut game, audio, _rx) = new_game();
        game.handle_action(GameAction::Start);
        assert_eq!(*audio.0.borrow(), vec![Call::Play("bgmusic.wav".to_string(), true)]);
        assert_eq!(game.session().bird.y, BIRD_Y);
        assert_eq!(game.session().velocity_y, 0);
        assert!(game.session().pipes.is_empty());
    }

    #[tokio::test]
    async fn test_jump_only_while_playing() {
        let (mut game, _audio, _rx) = new_game();
        game.handle_action(GameAction::Start);
        assert!(!game.handle_action(GameAction::Start));
        assert!(!game.handle_action(GameAction::Restart));
        assert_eq!(game.state(), PageId::Playing);

        game.handle_action(GameAction::Jump);
        assert_eq!(game.session().velocity_y, JUMP_VELOCITY);
    }

    #[tokio::test]
    async fn test_falling_ends_the_run() {
        let (mut game, audio, _rx) = new_game();
        game.handle_action(GameAction::Start);
        let ticks = play_until_over(&mut game);
        assert_eq!(ticks, 25);
        assert_eq!(game.state(), PageId::GameOver);
        assert!(!game.scheduler().is_running());
        assert_eq!(audio.0.borrow().last(), Some(&Call::Stop));
        assert!(render(&game).contains("Game Over"));
        assert!(render(&game).contains("Press R to Restart"));
    }

    #[tokio::test]
    async fn test_stale_ticks_are_ignored() {
        let (mut game, _audio, _rx) = new_game();
        assert!(!game.on_tick(0));
        game.handle_action(GameAction::Start);
        let epoch = game.scheduler().epoch();
        assert!(!game.on_tick(epoch + 1));
        assert!(game.on_tick(epoch));

        play_until_over(&mut game);
        let y = game.session().bird.y;
        assert!(!game.on_tick(epoch));
        game.on_spawn(epoch);
        assert_eq!(game.session().bird.y, y);
        assert!(game.session().pipes.is_empty());

        // A tick queued by the previous run must not leak into the next one.
        game.handle_action(GameAction::Restart);
        assert!(!game.on_tick(epoch));
        assert_eq!(game.session().bird.y, BIRD_Y);
    }

    #[tokio::test]
    async fn test_spawn_adds_a_pair() {
        let (mut game, _audio, _rx) = new_game();
        game.handle_action(GameAction::Start);
        let epoch = game.scheduler().epoch();
        game.on_spawn(epoch);
        game.on_spawn(epoch);
        assert_eq!(game.session().pipes.len(), 4);
    }

    #[tokio::test]
    async fn test_restart_resets_everything() {
        let (mut game, audio, _rx) = new_game();
        game.handle_action(GameAction::Start);
        let epoch = game.scheduler().epoch();
        game.session.pipes.push_back(Pipe::new(PipeKind::Bottom, -20, 4 * BOARD_HEIGHT));
        game.session.pipes.push_back(Pipe::new(PipeKind::Bottom, -20, 4 * BOARD_HEIGHT));
        game.on_spawn(epoch);
        play_until_over(&mut game);
        assert_eq!(game.session().score.value(), 1.0);
        assert!(render(&game).contains("Score: 1"));

        assert!(!game.handle_action(GameAction::Start));
        assert!(!game.handle_action(GameAction::Jump));
        assert_eq!(game.state(), PageId::GameOver);

        assert!(game.handle_action(GameAction::Restart));
        assert_eq!(game.state(), PageId::Playing);
        assert!(game.scheduler().is_current(epoch + 1));
        assert_eq!(game.session().score.value(), 0.0);
        assert!(game.session().pipes.is_empty());
        assert_eq!(game.session().bird.y, BIRD_Y);
        assert_eq!(game.session().velocity_y, 0);
        assert!(!game.session().game_over);
        assert_eq!(
            *audio.0.borrow(),
            vec![
                Call::Play("bgmusic.wav".to_string(), true),
                Call::Stop,
                Call::Play("bgmusic.wav".to_string(), true),
            ]
        );
    }

    #[tokio::test]
    async fn test_playing_draws_score() {
        let (mut game, _audio, _rx) = new_game();
        game.handle_action(GameAction::Start);
        let screen = render(&game);
        assert!(screen.contains('0'));
        assert!(!screen.contains("Press"));
    }

    #[tokio::test]
    async fn test_playing_paints_bird_and_every_pipe() {
        let (mut game, _audio, _rx) = new_game();
        game.handle_action(GameAction::Start);
        let epoch = game.scheduler().epoch();
        game.on_spawn(epoch);
        for _ in 0..20 {
            game.on_tick(epoch);
        }
        assert_eq!(game.state(), PageId::Playing);

        let assets = AssetStore::load(None).unwrap();
        let surface = game.surface(&assets);
        let session = game.session();
        assert_eq!(session.pipes.len(), 2);
        let sprites = std::iter::once((session.bird.asset(), session.bird.bounds()))
            .chain(session.pipes.iter().map(|pipe| (pipe.asset(), pipe.bounds())));
        for (id, bounds) in sprites {
            let (w, h) = (bounds.width as f32, bounds.height as f32);
            let pixel = assets.get(id).unwrap().sample(w / 2.0, h / 2.0, w, h).unwrap();
            let painted = surface.color_at(bounds.x as f32 + w / 2.0, bounds.y as f32 + h / 2.0);
            assert_eq!(painted, Some(Color::Rgb(pixel[0], pixel[1], pixel[2])), "{id} not painted");
        }
    }
}
