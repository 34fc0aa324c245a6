use color_eyre::eyre::Result;
use crossterm::event::KeyEvent;
use ratatui::{
    layout::Margin,
    style::{Color, Style},
    widgets::{Block, BorderType, Borders},
};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, error, info};

use crate::{
    action::Action,
    assets::AssetStore,
    audio::{build_audio, AudioService, SilentAudio},
    cli::Cli,
    config::Config,
    game::Game,
    tui,
};

pub struct App {
    config: Config,
    assets: AssetStore,
    game: Game,
    should_quit: bool,
    action_tx: UnboundedSender<Action>,
    action_rx: UnboundedReceiver<Action>,
}

impl App {
    pub fn new(args: Cli) -> Result<Self> {
        let mut config = Config::new()?;
        if args.assets.is_some() {
            config.config.assets_dir = args.assets;
        }
        let assets_dir = config.config.assets_dir.as_deref();
        info!(
            "Config dir {}, assets {:?}, audio {} (muted: {}), seed {:?}",
            config.config._config_dir.display(),
            assets_dir,
            config.audio.enabled,
            args.mute,
            args.seed
        );

        let assets = AssetStore::load(assets_dir)?;
        let audio: Box<dyn AudioService> =
            if args.mute { Box::new(SilentAudio) } else { build_audio(&config.audio, assets_dir) };

        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let game = Game::new(action_tx.clone(), audio, config.audio.track.clone(), &config.keybindings, args.seed);

        Ok(Self { config, assets, game, should_quit: false, action_tx, action_rx })
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut tui = tui::Tui::new()?;
        tui.enter()?;
        info!("Started in {}", self.game.state());

        loop {
            tokio::select! {
                Some(event) = tui.next() => self.handle_event(event)?,
                Some(action) = self.action_rx.recv() => self.update(&mut tui, action)?,
                else => break,
            }
            while let Ok(action) = self.action_rx.try_recv() {
                self.update(&mut tui, action)?;
            }
            if self.should_quit {
                tui.stop()?;
                break;
            }
        }
        tui.exit()?;
        Ok(())
    }

    fn handle_event(&mut self, event: tui::Event) -> Result<()> {
        match event {
            tui::Event::Init => self.action_tx.send(Action::Render)?,
            tui::Event::Resize(x, y) => self.action_tx.send(Action::Resize(x, y))?,
            tui::Event::Key(key) => self.handle_key(key)?,
            tui::Event::Error => self.action_tx.send(Action::Error("terminal event stream failed".to_string()))?,
        }
        Ok(())
    }

    fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        if let Some(action) = self.config.keybindings.resolve(self.game.state(), &key) {
            debug!("Got action: {action:?}");
            self.action_tx.send(action)?;
        }
        Ok(())
    }

    fn update(&mut self, tui: &mut tui::Tui, action: Action) -> Result<()> {
        match action {
            Action::Tick(epoch) => {
                if self.game.on_tick(epoch) {
                    self.render(tui)?;
                }
            },
            Action::SpawnPipes(epoch) => self.game.on_spawn(epoch),
            Action::Render => self.render(tui)?,
            Action::Resize(w, h) => {
                tui.resize(ratatui::layout::Rect::new(0, 0, w, h))?;
                self.render(tui)?;
            },
            Action::Quit => {
                info!("Quitting");
                self.should_quit = true;
            },
            Action::Error(e) => error!("{e}"),
            Action::Game(action) => {
                if self.game.handle_action(action) {
                    self.render(tui)?;
                }
            },
        }
        Ok(())
    }

    fn render(&mut self, tui: &mut tui::Tui) -> Result<()> {
        let surface = self.game.surface(&self.assets);
        tui.draw(|f| {
            let area = f.area();
            let border = Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .style(Style::default().bg(Color::Black));
            f.render_widget(border, area);
            f.render_widget(surface, area.inner(Margin { horizontal: 1, vertical: 1 }));
        })?;
        Ok(())
    }
}
