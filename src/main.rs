mod editor;
mod editor_api;
mod middle;
mod pipeline;
mod shared;
mod tui;

use std::fs::File;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use clap::{Parser, ValueEnum};
use crossterm::terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing::{info, warn};

use editor::{EditorSession, ReplConfig, ReplEngine};
use middle::Middle;
use pipeline::{config, tunes};
use pipeline::controls::ControlSet;
use pipeline::session::SessionState;
use shared::InputEvent;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Variant {
    /// p1 radio and tempo
    PartA,
    /// all six controls
    PartB,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Tune {
    Default,
    Pop,
}

impl Tune {
    fn text(self) -> &'static str {
        match self {
            Tune::Default => tunes::DEFAULT_TUNE,
            Tune::Pop => tunes::POP_TUNE,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "pattern-reactor")]
#[command(about = "Template preprocessor and control surface for a live-coding REPL", long_about = None)]
struct Cli {
    /// Built-in control layout
    #[arg(short, long, value_enum, default_value_t = Variant::PartB)]
    variant: Variant,

    /// JSON control set, overrides --variant
    #[arg(short, long)]
    controls: Option<PathBuf>,

    /// Built-in tune to start from; Ctrl+L restores it
    #[arg(long, value_enum, default_value_t = Tune::Default)]
    tune: Tune,

    /// Template file to start from instead of the built-in tune
    #[arg(short, long)]
    template: Option<PathBuf>,

    /// Line sent to the engine once, before the first play (repeatable)
    #[arg(long)]
    boot: Vec<String>,

    /// Line sent to the engine on stop
    #[arg(long, default_value = "hush")]
    hush: String,

    /// Line written before each evaluated block, e.g. ":{"
    #[arg(long)]
    block_start: Option<String>,

    /// Line written after each evaluated block, e.g. ":}"
    #[arg(long)]
    block_end: Option<String>,

    #[arg(long, default_value = "pattern-reactor.log")]
    log: PathBuf,

    /// Print the active control set as JSON and exit
    #[arg(long)]
    print_controls: bool,

    /// Engine command and its arguments, after `--`
    #[arg(last = true)]
    engine: Vec<String>,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let controls = match &cli.controls {
        Some(path) => config::load_controls(path)?,
        None => match cli.variant {
            Variant::PartA => ControlSet::part_a(),
            Variant::PartB => ControlSet::part_b(),
        },
    };
    if cli.print_controls {
        println!("{}", config::controls_to_json(&controls)?);
        return Ok(());
    }

    // the TUI owns stdout, so logs go to a file
    let log_file = File::create(&cli.log)?;
    tracing_subscriber::fmt()
        .with_writer(Mutex::new(log_file))
        .with_ansi(false)
        .init();

    let template = match &cli.template {
        Some(path) => config::load_template(path)?,
        None => cli.tune.text().to_string(),
    };
    let state = SessionState::new(controls).with_template(template);
    let mut middle = Middle::with_state(state).with_tune(cli.tune.text());

    let mut editor = EditorSession::new();
    if cli.engine.is_empty() {
        warn!("no engine command given, editor stays uninitialized");
    } else {
        let repl = ReplConfig {
            command: cli.engine.clone(),
            boot: cli.boot.clone(),
            hush: cli.hush.clone(),
            block_start: cli.block_start.clone(),
            block_end: cli.block_end.clone(),
        };
        match ReplEngine::spawn(repl, editor.output_sender()) {
            Ok(engine) => editor.initialize(Box::new(engine)),
            Err(e) => warn!("engine unavailable: {e:#}"),
        }
    }
    middle.sync_editor(editor.state(), editor.code());

    terminal::enable_raw_mode()?;
    let _guard = RawModeGuard; // auto drops when out of scope
    crossterm::execute!(std::io::stdout(), terminal::EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(std::io::stdout());
    let mut term = Terminal::new(backend)?;
    term.clear()?;
    info!("session started");

    let tick_rate = Duration::from_millis(16); // ~60fps
    let blink_start = Instant::now();
    let mut tui_state = tui::mode::TuiState::default();

    loop {
        let blink_on = (blink_start.elapsed().as_millis() / 500) % 2 == 0;
        let ds = middle.display_state();
        tui_state.focus = ds.focus;

        term.draw(|frame| {
            tui::view::render(frame, frame.area(), &ds, blink_on);
        })?;

        let events = tui::input::poll_input(tick_rate, &tui_state)?;
        for event in events {
            if event == InputEvent::Quit {
                info!("session ended");
                if editor.is_running() {
                    editor.stop();
                }
                return Ok(());
            }
            // commands from one event are applied in order: load before play
            for cmd in middle.handle_input(event) {
                editor.send(cmd);
            }
            middle.sync_editor(editor.state(), editor.code());
        }

        // engine output arrives from the reader thread; forward it unchanged
        while let Some(output) = editor.poll_output() {
            middle.on_engine_output(output);
        }
        middle.sync_editor(editor.state(), editor.code());
    }
}

struct RawModeGuard;
impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = crossterm::execute!(std::io::stdout(), terminal::LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}
