pub mod ui;

use catch_targets::{
    app_dirs::AppDirs,
    config::{ConfigStore, FileConfigStore},
    game::GameController,
    leaderboard::{ScoreEntry, ScoreStore, EMPTY_BOARD_MESSAGE},
    runtime::{CrosstermEventSource, FixedTicker, GameEvent, GameEventSource, Runner, Ticker},
    session::GameSettings,
    target::{Arena, Point},
    worker::ScoreWorker,
};
use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{
        DisableMouseCapture, EnableMouseCapture, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
        MouseButton, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Position, Rect},
    Terminal,
};
use std::{
    error::Error,
    fs::{self, OpenOptions},
    io::{self, stdin},
    path::{Path, PathBuf},
    sync::Arc,
    time::{Duration, Instant},
};

use crate::ui::{GameLayout, TitleLayout};

const TICK_RATE_MS: u64 = 50;
/// Long enough for a remote submit to time out and fall back to the local file
const SHUTDOWN_GRACE: Duration = Duration::from_secs(6);

/// click-the-target terminal mini game with a top-10 leaderboard
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Click as many targets as you can before the clock runs out. High scores go to a hosted leaderboard when one is configured and to a local top-10 file otherwise."
)]
pub struct Cli {
    /// base url of the hosted leaderboard, e.g. https://xyz.supabase.co
    #[clap(long)]
    remote_url: Option<String>,

    /// access key for the hosted leaderboard
    #[clap(long)]
    remote_key: Option<String>,

    /// file holding the local high score list
    #[clap(long = "scores-file")]
    scores_file: Option<PathBuf>,

    /// store the given options in the config file for later runs
    #[clap(long)]
    save_config: bool,

    /// print the current high scores and exit
    #[clap(short = 'l', long)]
    list: bool,

    /// delete the local high score list and exit
    #[clap(long)]
    reset_scores: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

pub struct App {
    pub game: GameController,
    /// Terminal area of the last frame, used to map mouse clicks
    pub area: Rect,
}

impl App {
    pub fn new(game: GameController) -> Self {
        let mut app = Self {
            game,
            area: Rect::new(0, 0, 80, 24),
        };
        app.resize(app.area);
        app
    }

    pub fn resize(&mut self, area: Rect) {
        self.area = area;
        let arena = GameLayout::new(area).arena;
        self.game.set_arena(Arena {
            width: arena.width,
            height: arena.height,
        });
    }

    fn on_key(&mut self, key: KeyEvent, now: Instant) -> Flow {
        if key.kind != KeyEventKind::Press {
            return Flow::Continue;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            // quitting from the prompt still keeps the score
            self.game.cancel_name();
            return Flow::Quit;
        }

        if self.game.name_prompt().is_some() {
            match key.code {
                KeyCode::Enter => self.game.confirm_name(),
                KeyCode::Esc => self.game.cancel_name(),
                KeyCode::Backspace => self.game.prompt_backspace(),
                KeyCode::Char(c) => self.game.prompt_input(c),
                _ => {}
            }
        } else if self.game.is_open() {
            match key.code {
                KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Char('s') => self.game.start(now),
                KeyCode::Esc | KeyCode::Char('q') => self.game.close(now),
                _ => {}
            }
        } else {
            match key.code {
                KeyCode::Enter | KeyCode::Char('g') => self.game.open(),
                KeyCode::Char('r') => self.game.refresh_board(),
                KeyCode::Esc | KeyCode::Char('q') => return Flow::Quit,
                _ => {}
            }
        }
        Flow::Continue
    }

    fn on_mouse(&mut self, mouse: MouseEvent, now: Instant) {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return;
        }
        let pos = Position::new(mouse.column, mouse.row);

        if !self.game.is_open() {
            if TitleLayout::new(self.area).trigger.contains(pos) {
                self.game.open();
            }
            return;
        }
        if self.game.name_prompt().is_some() {
            return;
        }

        let layout = GameLayout::new(self.area);
        if layout.arena.contains(pos) {
            let point = Point::new(pos.x - layout.arena.x, pos.y - layout.arena.y);
            self.game.hit(point, now);
        } else if layout.button.contains(pos) {
            self.game.start(now);
        } else if !layout.modal.contains(pos) {
            self.game.close(now);
        }
    }
}

fn init_logging(path: &Path) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    // the TUI owns stdout/stderr, so logs only ever go to the file
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .try_init()
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))
}

fn print_scores(top: &[ScoreEntry]) {
    if top.is_empty() {
        println!("{EMPTY_BOARD_MESSAGE}");
        return;
    }
    for (i, entry) in top.iter().enumerate() {
        println!("{:>2}. {:<24} {:>5}", i + 1, entry.name, entry.score);
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    if let Some(path) = AppDirs::log_path() {
        if let Err(e) = init_logging(&path) {
            eprintln!("logging disabled: {e}");
        }
    }

    let config_store = FileConfigStore::new();
    let config = config_store.load().merged(
        cli.remote_url.clone(),
        cli.remote_key.clone(),
        cli.scores_file.clone(),
    );
    if cli.save_config {
        config_store.save(&config)?;
        println!("saved config to {}", config_store.path().display());
    }

    let store = Arc::new(ScoreStore::from_config(&config));
    log::info!("using {} leaderboard", store.backend());

    if cli.reset_scores {
        store.local().clear()?;
        println!("cleared {}", store.local().path().display());
        return Ok(());
    }
    if cli.list {
        print_scores(&store.fetch_top());
        return Ok(());
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let events = CrosstermEventSource::new();
    let worker = ScoreWorker::new(store, events.sender());
    let mut app = App::new(GameController::new(
        GameSettings::default(),
        Box::new(worker.clone()),
    ));
    app.game.refresh_board();
    let runner = Runner::new(events, FixedTicker::new(Duration::from_millis(TICK_RATE_MS)));

    let result = start_tui(&mut terminal, &mut app, &runner);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    // an error can leave the name prompt open; closing saves that score too
    app.game.close(Instant::now());
    worker.wait_idle(SHUTDOWN_GRACE);

    result
}

fn start_tui<B: Backend, E: GameEventSource, T: Ticker>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    runner: &Runner<E, T>,
) -> Result<(), Box<dyn Error>> {
    loop {
        let size = terminal.size()?;
        app.resize(Rect::new(0, 0, size.width, size.height));
        terminal.draw(|f| f.render_widget(&*app, f.area()))?;

        let now = Instant::now();
        match runner.step() {
            GameEvent::Tick | GameEvent::Resize => {}
            GameEvent::Key(key) => {
                if app.on_key(key, now) == Flow::Quit {
                    break;
                }
            }
            GameEvent::Mouse(mouse) => app.on_mouse(mouse, now),
            GameEvent::Scores(event) => app.game.on_score_event(event),
        }
        app.game.tick(Instant::now());
    }

    Ok(())
}
