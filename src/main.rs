mod ui;

use bunnybash::{
    actor::ActorId,
    app_dirs::AppDirs,
    config::{Config, ConfigStore, FileConfigStore},
    game::MAX_FRAME_MS,
    render::FrameView,
    runtime::{CrosstermInputSource, FixedTicker, FrameClock, InputEvent, Runner},
    Game, GameEvent, GameSettings, PauseMode, StrikeOutcome,
};
use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    fs::{self, OpenOptions},
    io::{self, stdin},
    sync::Mutex,
    time::Duration,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Frames the screen stays red after a hostile bunny is hit
const ALERT_FLASH_FRAMES: u8 = 6;

/// whack the bunnies, spare yourself the angry ones
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A terminal reflex game: bunnies pop out of three holes and you have sixty seconds to bash the friendly ones (+10) while leaving the angry ones alone (-20). The longer you last, the faster they pop."
)]
pub struct Cli {
    /// milliseconds between render frames
    #[clap(long, value_parser = clap::value_parser!(u64).range(1..=MAX_FRAME_MS))]
    frame_ms: Option<u64>,

    /// what pausing does to bunnies already on their way up or down
    #[clap(long, value_enum)]
    pause_mode: Option<PauseMode>,

    /// seed the bunny schedule for a reproducible session
    #[clap(long)]
    seed: Option<u64>,

    /// store the effective settings as the new defaults
    #[clap(long)]
    save_config: bool,

    /// start playing right away instead of waiting for enter
    #[clap(long)]
    autostart: bool,
}

impl Cli {
    /// CLI values win over whatever was stored
    fn apply(&self, mut cfg: Config) -> Config {
        if let Some(frame_ms) = self.frame_ms {
            cfg.frame_ms = frame_ms;
        }
        if let Some(pause_mode) = self.pause_mode {
            cfg.pause_mode = pause_mode;
        }
        if self.seed.is_some() {
            cfg.seed = self.seed;
        }
        cfg
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AppState {
    Playing,
    Results,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Control {
    Continue,
    Quit,
}

#[derive(Debug)]
pub struct App {
    pub game: Game,
    pub state: AppState,
    pub flash_frames: u8,
    pub last_strike: Option<(ActorId, StrikeOutcome)>,
}

impl App {
    pub fn new(game: Game) -> Self {
        Self {
            game,
            state: AppState::Playing,
            flash_frames: 0,
            last_strike: None,
        }
    }

    pub fn from_config(cfg: &Config, width: u16, height: u16) -> Self {
        let game = Game::with_seed(
            GameSettings::from(cfg),
            cfg.seed,
            width as f64,
            height as f64,
        );
        Self::new(game)
    }

    /// One render tick: advance the game by the wall time that passed, then
    /// consume whatever it announced.
    pub fn on_frame(&mut self, dt_ms: u64) {
        self.game.frame(dt_ms);
        self.flash_frames = self.flash_frames.saturating_sub(1);

        for event in self.game.drain_events() {
            match event {
                GameEvent::Alert { .. } => self.flash_frames = ALERT_FLASH_FRAMES,
                GameEvent::SessionEnded { final_score } => {
                    info!(final_score, "showing results");
                    self.flash_frames = 0;
                    self.state = AppState::Results;
                }
            }
        }
    }

    fn start(&mut self) {
        self.game.start();
        self.state = AppState::Playing;
        self.last_strike = None;
    }

    fn reset(&mut self) {
        self.game.reset();
        self.state = AppState::Playing;
        self.flash_frames = 0;
        self.last_strike = None;
    }

    fn strike(&mut self, id: ActorId) {
        let outcome = self.game.strike(id);
        self.last_strike = Some((id, outcome));
    }

    fn on_key(&mut self, key: KeyEvent) -> Control {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Control::Quit;
        }

        match (self.state, key.code) {
            (_, KeyCode::Esc) | (_, KeyCode::Char('q')) => return Control::Quit,
            (AppState::Playing, KeyCode::Char('1')) | (AppState::Playing, KeyCode::Char('j')) => {
                self.strike(0)
            }
            (AppState::Playing, KeyCode::Char('2')) | (AppState::Playing, KeyCode::Char('k')) => {
                self.strike(1)
            }
            (AppState::Playing, KeyCode::Char('3')) | (AppState::Playing, KeyCode::Char('l')) => {
                self.strike(2)
            }
            (AppState::Playing, KeyCode::Char(' ')) => self.game.pause(),
            (_, KeyCode::Enter) | (_, KeyCode::Char('s')) => self.start(),
            (AppState::Results, KeyCode::Char(' ')) => self.start(),
            (_, KeyCode::Char('r')) => self.reset(),
            _ => {}
        }
        Control::Continue
    }
}

fn init_logging() {
    let Some(path) = AppDirs::log_path() else {
        return;
    };
    if let Some(parent) = path.parent() {
        if fs::create_dir_all(parent).is_err() {
            return;
        }
    }
    let Ok(file) = OpenOptions::new().create(true).append(true).open(&path) else {
        return;
    };

    let filter = EnvFilter::try_from_env("BUNNYBASH_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init();
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    init_logging();

    let store = FileConfigStore::new();
    let cfg = cli.apply(store.load());
    if cli.save_config {
        if let Err(e) = store.save(&cfg) {
            warn!(path = %store.path().display(), "could not save config: {e}");
        }
    }

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let size = terminal.size()?;
    let mut app = App::from_config(&cfg, size.width, size.height);
    if cli.autostart {
        app.start();
    }
    let frame_ms = app.game.settings().frame_ms;
    let result = start_tui(&mut terminal, &mut app, frame_ms);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn start_tui<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    frame_ms: u64,
) -> Result<(), Box<dyn Error>> {
    let mut runner = Runner::new(
        CrosstermInputSource::new(),
        FixedTicker::new(Duration::from_millis(frame_ms)),
    );
    let mut clock = FrameClock::new();

    terminal.draw(|f| ui::draw(app, f))?;

    loop {
        match runner.step() {
            InputEvent::Tick => {
                let dt = clock.elapsed_ms();
                if FrameView::capture(&app.game).wants_next_frame() {
                    app.on_frame(dt);
                    terminal.draw(|f| ui::draw(app, f))?;
                }
            }
            InputEvent::Resize(width, height) => {
                app.game.resize(width as f64, height as f64);
                terminal.draw(|f| ui::draw(app, f))?;
            }
            InputEvent::Key(key) => {
                let was_running = app.game.session().running;
                if app.on_key(key) == Control::Quit {
                    break;
                }
                if !was_running && app.game.session().running {
                    // idle time before a start must not count as game time
                    clock.restart();
                }
                terminal.draw(|f| ui::draw(app, f))?;
            }
        }
    }

    Ok(())
}
