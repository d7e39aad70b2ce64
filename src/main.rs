use civiquiz::{
    app::{describe_build_error, App, Flow},
    app_dirs::AppDirs,
    bank::{CardType, QuestionBank, QuestionRecord},
    builder::{QuizConfiguration, SessionBuilder, SimulationConfig, ThemeConfig},
    config::{ColorTheme, FilePreferenceStore, PreferenceStore, Preferences},
    error::{BuildError, QuizError},
    generator::GeminiGenerator,
    i18n::{Locale, Translations},
    quota::{practice_theme, PRACTICE_THEMES},
    runtime::{CrosstermEventSource, FixedTicker, QuizEvent, Runner, TickClock},
    ui::screen::current_screen,
};
use clap::{error::ErrorKind, CommandFactory, Parser, ValueEnum};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Frame, Terminal,
};
use std::{
    fs::{self, OpenOptions},
    io::{self, stdin},
    path::PathBuf,
    process,
    sync::Mutex,
};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// multiple-choice trainer for the French civic exam
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Timed 28-question exam simulations and per-theme practice for the French civic exam, with optional AI-generated situational questions."
)]
pub struct Cli {
    /// directory holding the question bank files (CSP.JSON, CR.JSON)
    #[clap(short = 'd', long, default_value = "data")]
    bank_dir: PathBuf,

    /// residence card the bank is prepared for
    #[clap(short = 'c', long, value_enum)]
    card: Option<CardType>,

    /// full exam simulation or single-theme practice
    #[clap(short = 'm', long, value_enum, default_value_t = Mode::Simulation)]
    mode: Mode,

    /// block key to practise in theme mode (e.g. bloc1_principes_valeurs)
    #[clap(short = 't', long, required_if_eq("mode", "theme"))]
    theme: Option<String>,

    /// number of questions in theme mode
    #[clap(short = 'n', long, default_value_t = 10)]
    count: usize,

    /// run the simulation against the 45 minute clock
    #[clap(long)]
    timed: bool,

    /// append AI-generated situational questions to the simulation
    #[clap(long)]
    situational: bool,

    /// API key for the question generator
    #[clap(long, env = "CIVIQUIZ_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// interface language
    #[clap(short = 'l', long, value_enum)]
    lang: Option<Locale>,

    /// color palette
    #[clap(long, value_enum)]
    color_theme: Option<ColorTheme>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub enum Mode {
    Simulation,
    Theme,
}

impl Cli {
    /// Flags given on the command line win over stored preferences
    fn merge_into(&self, mut prefs: Preferences) -> Preferences {
        if let Some(lang) = self.lang {
            prefs.language = lang;
        }
        if let Some(color_theme) = self.color_theme {
            prefs.color_theme = color_theme;
        }
        if let Some(card) = self.card {
            prefs.card_type = card;
        }
        if let Some(key) = self.api_key.as_ref().filter(|k| !k.trim().is_empty()) {
            prefs.api_key = Some(key.clone());
        }
        prefs
    }

    fn configuration(&self, prefs: &Preferences) -> QuizConfiguration {
        match self.mode {
            Mode::Simulation => QuizConfiguration::Simulation(SimulationConfig {
                timed: self.timed,
                situational: self.situational,
                api_key: prefs.api_key.clone(),
            }),
            Mode::Theme => {
                let theme_key = self
                    .theme
                    .clone()
                    .unwrap_or_else(|| PRACTICE_THEMES[0].key.to_string());
                let label = practice_theme(&theme_key)
                    .map(|t| t.label.to_string())
                    .unwrap_or_else(|| theme_key.clone());
                QuizConfiguration::Theme(ThemeConfig {
                    theme_key,
                    count: self.count,
                    label,
                })
            }
        }
    }
}

fn main() -> Result<(), QuizError> {
    let cli = Cli::parse();
    init_logging();

    let store = FilePreferenceStore::new();
    let prefs = cli.merge_into(store.load());
    if let Err(err) = store.save(&prefs) {
        warn!(path = %store.path().display(), error = %err, "could not save preferences");
    }
    let translations = Translations::load(prefs.language);

    let bank_path = prefs.card_type.bank_path(&cli.bank_dir);
    let bank = match QuestionBank::load(&bank_path) {
        Ok(bank) => bank,
        Err(err) => {
            error!(path = %bank_path.display(), error = %err, "question bank unavailable");
            eprintln!(
                "{}",
                translations.lookup("error.bank", &[("file", &prefs.card_type.file_name())])
            );
            process::exit(1);
        }
    };

    let configuration = cli.configuration(&prefs);
    let generator = GeminiGenerator::from_env();
    let builder = SessionBuilder::new(&bank).with_generator(&generator);
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    let questions = match runtime.block_on(builder.build(&configuration)) {
        Ok(questions) => questions,
        Err(err) => {
            error!(error = %err, "could not build the quiz");
            eprintln!("{}", describe_build_error(&translations, &err));
            process::exit(1);
        }
    };

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let mut app = App::new(configuration, translations, prefs.color_theme);
    app.start(questions)?;
    info!(mode = %cli.mode, card = %prefs.card_type, "quiz started");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = start_tui(&mut terminal, &mut app, |configuration| {
        runtime.block_on(builder.build(configuration))
    });

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result?;
    Ok(())
}

fn start_tui<B, F>(terminal: &mut Terminal<B>, app: &mut App, mut rebuild: F) -> io::Result<()>
where
    B: Backend,
    F: FnMut(&QuizConfiguration) -> Result<Vec<QuestionRecord>, BuildError>,
{
    let runner = Runner::new(CrosstermEventSource::new(), FixedTicker::default());
    let mut clock = TickClock::new();
    terminal.draw(|f| ui(app, f))?;

    loop {
        let event = runner.step();
        let redraw_always = !matches!(event, QuizEvent::Tick);
        let was_finished = app.quiz.is_finished();

        match app.on_event(event, clock.lap()) {
            Flow::Continue => {}
            Flow::Quit => break,
            Flow::Restart => {
                let configuration = app.configuration.clone();
                let restarted = rebuild(&configuration)
                    .and_then(|questions| app.start(questions).map_err(BuildError::from));
                match restarted {
                    Ok(()) => info!("quiz restarted"),
                    Err(err) => {
                        warn!(error = %err, "restart failed");
                        app.restart_failed(&err);
                    }
                }
                // the rebuild may have waited on the network
                clock = TickClock::new();
            }
        }

        let counting = app.quiz.countdown().is_some_and(|c| c.is_running());
        if redraw_always || counting || was_finished != app.quiz.is_finished() {
            terminal.draw(|f| ui(app, f))?;
        }
    }

    Ok(())
}

fn ui(app: &App, f: &mut Frame) {
    current_screen(app.state()).render(app, f);
}

/// Log to a file under the state dir; stderr belongs to the terminal UI.
fn init_logging() {
    let Some(path) = AppDirs::log_path() else {
        return;
    };
    if let Some(dir) = path.parent() {
        if fs::create_dir_all(dir).is_err() {
            return;
        }
    }
    let Ok(file) = OpenOptions::new().create(true).append(true).open(&path) else {
        return;
    };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("civiquiz=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
}
