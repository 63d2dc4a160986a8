use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Frame, Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    sync::mpsc,
    time::Instant,
};
use tracing_subscriber::EnvFilter;

use pust::{
    config::{Config, ConfigStore, FileConfigStore},
    effects::{TerminalBell, TerminalEffects, UnsupportedWakeLock},
    runtime::{self, Event, Sampler},
    session::{Session, SessionConfig, Status},
    ui::SessionScreen,
    util,
};

const EXHALE_MIN_SECS: u64 = 6;
const EXHALE_MAX_SECS: u64 = 8;
const LIMIT_FIELD_MAX_DIGITS: usize = 3;

/// calm paced-breathing timer for the terminal
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A calm paced-breathing timer: repeating inhale/exhale cycles with an audible cue at each phase change, an optional session limit in minutes, and a completed-session log."
)]
pub struct Cli {
    /// seconds per inhale (falls back to the saved config)
    #[clap(short = 'i', long, value_parser = clap::value_parser!(u64).range(1..))]
    inhale_secs: Option<u64>,

    /// seconds per exhale (falls back to the saved config)
    #[clap(short = 'e', long, value_parser = clap::value_parser!(u64).range(1..))]
    exhale_secs: Option<u64>,

    /// stop the session after this many minutes; 0 means unlimited
    #[clap(short = 'm', long)]
    minutes: Option<u64>,

    /// start with the audible cue enabled
    #[clap(short = 's', long)]
    sound: bool,
}

type TerminalSession = Session<TerminalEffects<UnsupportedWakeLock>>;

#[derive(Debug, PartialEq)]
enum Flow {
    Continue,
    Quit,
}

pub struct App {
    session: TerminalSession,
    /// Raw digits of the time-limit field, mirrored into the session config.
    limit_input: String,
}

impl App {
    pub fn new(cli: &Cli, saved: Config, sampler: Sampler) -> Self {
        let time_limit_mins = match cli.minutes {
            Some(0) => None,
            Some(mins) => Some(mins),
            None => saved.time_limit_mins,
        };
        let session_config = SessionConfig {
            inhale_secs: cli.inhale_secs.unwrap_or(saved.inhale_secs),
            exhale_secs: cli.exhale_secs.unwrap_or(saved.exhale_secs),
            time_limit_mins,
        };
        let effects = TerminalEffects::new(
            TerminalBell::new(cli.sound || saved.sound),
            UnsupportedWakeLock::default(),
        );
        Self {
            limit_input: time_limit_mins.map_or(String::new(), |mins| mins.to_string()),
            session: Session::new(session_config, effects, sampler),
        }
    }

    fn render(&self, f: &mut Frame) {
        f.render_widget(
            SessionScreen {
                session: &self.session,
                limit_input: &self.limit_input,
                sound: self.session.sink().bell.is_enabled(),
            },
            f.area(),
        );
    }

    fn take_render(&mut self) -> bool {
        self.session.sink_mut().take_render()
    }

    /// Settings are only editable on the idle screen, mirroring which
    /// controls the session screens expose.
    fn settings_open(&self) -> bool {
        self.session.status() == Status::Idle
    }

    fn apply_limit_field(&mut self) {
        self.session
            .set_time_limit(util::parse_minutes(&self.limit_input));
    }

    fn adjust_exhale(&mut self, up: bool) {
        let current = self.session.config().exhale_secs;
        let next = if up {
            (current + 1).min(EXHALE_MAX_SECS)
        } else {
            current.saturating_sub(1).max(EXHALE_MIN_SECS)
        };
        self.session.set_exhale_secs(next);
    }

    fn start_preset(&mut self, minutes: u64) {
        self.limit_input = minutes.to_string();
        self.session.start_with_preset(minutes, Instant::now());
    }

    fn handle_key(&mut self, key: KeyEvent) -> Flow {
        match key.code {
            KeyCode::Esc => return Flow::Quit,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return Flow::Quit;
            }
            KeyCode::Char(' ') => {
                if self.session.is_running() {
                    self.session.pause();
                } else if !self.session.is_complete() {
                    self.apply_limit_field();
                    self.session.start(Instant::now());
                }
            }
            KeyCode::Char('r') => {
                if !self.session.is_running() {
                    self.session.reset();
                    self.limit_input.clear();
                }
            }
            KeyCode::Char('m') if self.settings_open() => {
                self.session.sink_mut().bell.toggle();
            }
            KeyCode::Char(c) if c.is_ascii_digit() && self.settings_open() => {
                if self.limit_input.len() < LIMIT_FIELD_MAX_DIGITS {
                    self.limit_input.push(c);
                    self.apply_limit_field();
                }
            }
            KeyCode::Backspace if self.settings_open() => {
                self.limit_input.pop();
                self.apply_limit_field();
            }
            KeyCode::Up if self.settings_open() => self.adjust_exhale(true),
            KeyCode::Down if self.settings_open() => self.adjust_exhale(false),
            KeyCode::F(1) if self.settings_open() => self.start_preset(2),
            KeyCode::F(2) if self.settings_open() => self.start_preset(5),
            KeyCode::F(3) if self.settings_open() => self.start_preset(10),
            _ => {}
        }
        Flow::Continue
    }

    fn current_config(&self) -> Config {
        let session_config = self.session.config();
        Config {
            inhale_secs: session_config.inhale_secs,
            exhale_secs: session_config.exhale_secs,
            sound: self.session.sink().bell.is_enabled(),
            time_limit_mins: session_config.time_limit_mins,
        }
    }
}

fn init_tracing() {
    // Opt-in only; an unsolicited subscriber would write over the TUI.
    if std::env::var("RUST_LOG").is_ok() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_writer(io::stderr)
            .try_init();
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_tracing();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let store = FileConfigStore::new();
    let (tx, rx) = mpsc::channel();
    runtime::spawn_key_reader(tx.clone());
    let mut app = App::new(&cli, store.load(), Sampler::new(tx));

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = start_tui(&mut terminal, &mut app, &rx);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen,)?;
    terminal.show_cursor()?;

    // Quitting mid-session releases the wake request and stops sampling.
    if app.session.is_running() {
        app.session.pause();
    }
    if let Err(err) = store.save(&app.current_config()) {
        tracing::warn!(%err, "could not save config");
    }

    res
}

fn start_tui<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    rx: &mpsc::Receiver<Event>,
) -> Result<(), Box<dyn Error>> {
    terminal.draw(|f| app.render(f))?;

    loop {
        match rx.recv()? {
            Event::Tick => {
                app.session.tick(Instant::now());
                if app.take_render() {
                    terminal.draw(|f| app.render(f))?;
                }
            }
            Event::Resize => {
                terminal.draw(|f| app.render(f))?;
            }
            Event::Key(key) => {
                if key.kind == KeyEventKind::Press {
                    if app.handle_key(key) == Flow::Quit {
                        break;
                    }
                    terminal.draw(|f| app.render(f))?;
                }
            }
        }
    }

    Ok(())
}
