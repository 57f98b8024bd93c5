mod ui;

use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use flick::{
    app_dirs::AppDirs,
    clock::SystemClock,
    config::{Config, ConfigStore, FileConfigStore},
    engine::{ClickOutcome, EndScreen, RenderCommand, SessionEngine},
    leaderboard,
    logging::init_file_logging,
    runtime::{CrosstermEventSource, DriverEvent, FixedTicker, Runner, TICK_RATE_MS},
    session::Phase,
    store::{CsvScoreStore, ScoreStore},
    SessionError,
};
use rand::{rngs::StdRng, SeedableRng};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::Rect,
    Frame, Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    path::PathBuf,
    time::{Duration, Instant},
};
use tracing::{info, warn};

use crate::ui::field::FieldGeometry;

/// How long a miss keeps the field flashed
const FLASH_MS: u64 = 100;
/// Runner ticks per countdown step; each digit stays up for one second
const TICKS_PER_COUNT: u32 = (1000 / TICK_RATE_MS) as u32;

/// hit the target before the clock runs out
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A reaction trainer for the terminal: click the target as fast as you can until the session clock runs out. Results are saved and ranked against your previous sessions."
)]
pub struct Cli {
    /// play-field width in field units
    #[clap(long)]
    width: Option<u32>,

    /// play-field height in field units
    #[clap(long)]
    height: Option<u32>,

    /// side length of the target in field units
    #[clap(short = 't', long)]
    target_size: Option<u32>,

    /// countdown length in seconds before the session starts
    #[clap(short = 'c', long)]
    countdown: Option<u32>,

    /// session length in seconds
    #[clap(short = 's', long)]
    duration: Option<f64>,

    /// number of leaderboard entries to show
    #[clap(short = 'l', long)]
    limit: Option<usize>,

    /// name stored with your score
    #[clap(short = 'n', long)]
    name: Option<String>,

    /// score file to read and append to
    #[clap(long)]
    scores: Option<PathBuf>,

    /// seed for target placement, for reproducible sessions
    #[clap(long)]
    seed: Option<u64>,

    /// write the effective settings to the config file
    #[clap(long)]
    save_config: bool,

    /// print the leaderboard and exit
    #[clap(long)]
    print_leaderboard: bool,

    /// log destination (filter with FLICK_LOG, e.g. FLICK_LOG=debug)
    #[clap(long)]
    log_file: Option<PathBuf>,
}

impl Cli {
    /// Applies command line overrides on top of the saved config
    fn apply(&self, mut config: Config) -> Config {
        if let Some(w) = self.width {
            config.field_width = w;
        }
        if let Some(h) = self.height {
            config.field_height = h;
        }
        if let Some(t) = self.target_size {
            config.target_size = t;
        }
        if let Some(c) = self.countdown {
            config.countdown = c;
        }
        if let Some(d) = self.duration {
            config.duration_secs = d;
        }
        if let Some(l) = self.limit {
            config.leaderboard_limit = l;
        }
        if let Some(n) = &self.name {
            config.player_name = n.clone();
        }
        if let Some(s) = &self.scores {
            config.scores_path = Some(s.clone());
        }
        config
    }
}

pub type Engine = SessionEngine<SystemClock, StdRng, CsvScoreStore>;

/// What the screen currently shows, built from the engine's render commands
#[derive(Debug, Clone, Default)]
pub struct View {
    pub countdown: Option<u32>,
    pub target: Option<(u32, u32, u32)>,
    pub score: u32,
    pub seconds_remaining: f64,
    pub flash_until: Option<Instant>,
    pub end: Option<EndScreen>,
    pub store_error: Option<String>,
}

impl View {
    pub fn apply(&mut self, command: RenderCommand) {
        match command {
            RenderCommand::ShowCountdown(n) => self.countdown = Some(n),
            RenderCommand::DrawTarget { x, y, size } => {
                self.countdown = None;
                self.target = Some((x, y, size));
            }
            RenderCommand::ClearTarget => self.target = None,
            RenderCommand::UpdateScore(score) => self.score = score,
            RenderCommand::UpdateTimeRemaining(secs) => self.seconds_remaining = secs,
            RenderCommand::FlashMiss => {
                self.flash_until = Some(Instant::now() + Duration::from_millis(FLASH_MS))
            }
            RenderCommand::ShowEndScreen(end) => {
                self.countdown = None;
                self.flash_until = None;
                self.end = Some(end);
            }
        }
    }

    pub fn is_flashing(&self) -> bool {
        self.flash_until.is_some_and(|until| Instant::now() < until)
    }
}

#[derive(Debug)]
pub struct App {
    pub config: Config,
    pub seed: Option<u64>,
    pub store: CsvScoreStore,
    pub engine: Engine,
    pub view: View,
    /// Last frame area, used to map mouse cells back to field coordinates
    pub screen: Rect,
    pub round: u64,
    countdown_ticks: u32,
}

impl App {
    pub fn new(config: Config, seed: Option<u64>) -> Result<Self, SessionError> {
        let store = CsvScoreStore::with_path(config.scores_path());
        let engine = Self::new_engine(&config, seed, 0, &store)?;
        let mut app = Self {
            config,
            seed,
            store,
            engine,
            view: View::default(),
            screen: Rect::default(),
            round: 0,
            countdown_ticks: 0,
        };
        app.start();
        Ok(app)
    }

    fn new_engine(
        config: &Config,
        seed: Option<u64>,
        round: u64,
        store: &CsvScoreStore,
    ) -> Result<Engine, SessionError> {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(round)),
            None => StdRng::from_entropy(),
        };
        SessionEngine::new(config.session_config(), SystemClock::new(), rng, store.clone())
    }

    fn start(&mut self) {
        self.view = View {
            seconds_remaining: self.config.duration_secs,
            ..View::default()
        };
        self.countdown_ticks = 0;
        for command in self.engine.start() {
            self.view.apply(command);
        }
    }

    /// Replaces the finished session with a fresh one over the same store
    pub fn repeat(&mut self) -> Result<(), SessionError> {
        self.round += 1;
        self.engine = Self::new_engine(&self.config, self.seed, self.round, &self.store)?;
        info!(round = self.round, "repeating session");
        self.start();
        Ok(())
    }

    pub fn on_tick(&mut self) {
        if self.engine.phase() == Phase::Countdown {
            self.countdown_ticks += 1;
            if self.countdown_ticks < TICKS_PER_COUNT {
                return;
            }
            self.countdown_ticks = 0;
        }

        let result = self.engine.tick();
        if let Some(e) = result.store_error {
            warn!(error = %e, "session results could not be fully stored");
            self.view.store_error = Some(e.to_string());
        }
        for command in result.commands {
            self.view.apply(command);
        }
    }

    pub fn on_click(&mut self, column: u16, row: u16) -> ClickOutcome {
        let area = ui::field_area(self.screen);
        let cfg = self.engine.config();
        let geometry = FieldGeometry::new(area, cfg.field_width, cfg.field_height);
        let aim = self
            .engine
            .state()
            .target
            .map(|t| t.center(cfg.target_size));

        let Some((x, y)) = geometry.click_point(column, row, aim) else {
            return ClickOutcome::Ignored;
        };

        let result = self.engine.click(x, y);
        for command in result.commands {
            self.view.apply(command);
        }
        result.outcome
    }
}

fn print_leaderboard(config: &Config) -> Result<(), Box<dyn Error>> {
    let store = CsvScoreStore::with_path(config.scores_path());
    let records = store.read_all()?;
    let entries = leaderboard::compute(&records, config.leaderboard_limit, None);
    if entries.is_empty() {
        println!("No scores yet in {}", store.path().display());
    } else {
        print!("{}", leaderboard::format_table(&entries));
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let config_store = FileConfigStore::new();
    let config = cli.apply(config_store.load());

    let log_path = cli.log_file.clone().unwrap_or_else(AppDirs::log_path);
    if let Err(e) = init_file_logging(&log_path) {
        eprintln!("logging disabled: {e}");
    }

    if cli.save_config {
        config_store.save(&config)?;
    }

    if cli.print_leaderboard {
        return print_leaderboard(&config);
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let mut app = match App::new(config, cli.seed) {
        Ok(app) => app,
        Err(e) => {
            let mut cmd = Cli::command();
            cmd.error(ErrorKind::ValueValidation, e).exit();
        }
    };

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let outcome = start_tui(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableMouseCapture,
        LeaveAlternateScreen,
    )?;
    terminal.show_cursor()?;

    outcome
}

fn draw(app: &mut App, f: &mut Frame) {
    app.screen = f.area();
    f.render_widget(&*app, f.area());
}

fn start_tui<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(CrosstermEventSource::new(), FixedTicker::default());

    terminal.draw(|f| draw(app, f))?;

    loop {
        match runner.step() {
            DriverEvent::Tick => {
                app.on_tick();
            }
            DriverEvent::Resize => {}
            DriverEvent::Click { column, row } => {
                app.on_click(column, row);
            }
            DriverEvent::Key(key) => match key.code {
                KeyCode::Esc | KeyCode::Char('q') => break,
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => break,
                KeyCode::Char('r') if app.engine.has_finished() => app.repeat()?,
                _ => {}
            },
        }
        terminal.draw(|f| draw(app, f))?;
    }

    Ok(())
}
