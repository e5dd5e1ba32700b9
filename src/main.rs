use std::io::{self, stdout, BufRead, Stdout, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use clap::{Parser, Subcommand};
use crossbeam_channel::{Receiver, TryRecvError};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use ratatui::{backend::CrosstermBackend, Terminal};

use gizmo::app::LogicThread;
use gizmo::calculator::{pending_line, present_display, run_script};
use gizmo::config::Config;
use gizmo::fish::{self, FishBlob, WoodenFish};
use gizmo::food::{self, FoodBlob, FoodPicker};
use gizmo::render::RenderState;
use gizmo::store::Store;
use gizmo::tone::{self, TerminalBell, DEFAULT_SAMPLE_RATE, KNOCK};
use gizmo::{ui, zlog, Result};

const FRAME_DURATION: Duration = Duration::from_micros(16_666); // 60fps

/// Gizmo - a calculator, a food picker and an electronic wooden fish
#[derive(Parser, Debug)]
#[command(name = "gizmo")]
#[command(version, about, long_about = None)]
#[command(
    after_help = "ENVIRONMENT:\n    GIZMO_DEBUG=1   Enable debug logging (alternative to --debug)"
)]
pub struct Cli {
    /// Enable debug logging (writes to ~/.gizmo/gizmo.log)
    #[arg(short = 'd', long, global = true)]
    pub debug: bool,

    /// Use the light theme
    #[arg(long, global = true)]
    pub light: bool,

    /// Do not play the knock tone
    #[arg(long, global = true)]
    pub no_sound: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    /// Command-line flags win over the config file.
    pub fn apply_overrides(&self, config: &mut Config) {
        if self.light {
            config.dark_mode = false;
        }
        if self.no_sound {
            config.sound = false;
        }
    }
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Evaluate a key script, e.g. "2+3*4=" (c clears, n toggles sign, < deletes)
    Calc {
        /// Keys to press, in order
        #[arg(allow_hyphen_values = true)]
        keys: String,
    },

    /// Pick something to eat
    Eat {
        /// Show recent picks instead of picking
        #[arg(long)]
        history: bool,
    },

    /// Knock the wooden fish
    Knock {
        /// Number of knocks
        #[arg(long, short = 'n', default_value_t = 1, value_parser = clap::value_parser!(u64).range(1..))]
        count: u64,
    },

    /// Show accumulated merit
    Merit {
        /// Clear both counters
        #[arg(long)]
        reset: bool,

        /// Skip confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },

    /// Export the knock tone as a WAV file
    Tone {
        /// Output path
        path: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on debug flag
    gizmo::log::init_with_debug(cli.debug);

    let mut config = Config::load()?;
    cli.apply_overrides(&mut config);
    let store = Store::new(config.data_dir()?);

    // Handle subcommands
    match cli.command {
        Some(Command::Calc { keys }) => return run_calc(&keys),
        Some(Command::Eat { history }) => return run_eat(&store, history),
        Some(Command::Knock { count }) => return run_knock(&store, &config, count),
        Some(Command::Merit { reset, yes }) => return run_merit(&store, &config, reset, yes),
        Some(Command::Tone { path }) => return run_tone(&path),
        None => {
            // No subcommand: launch TUI
        }
    }

    if cli.debug {
        zlog!("gizmo starting (debug mode enabled)");
    } else {
        zlog!("gizmo starting");
    }

    let shutdown = Arc::new(AtomicBool::new(false));
    let (state_tx, state_rx) = crossbeam_channel::bounded::<RenderState>(1);
    let (bell_tx, bell_rx) = crossbeam_channel::bounded::<()>(1);

    let shutdown_clone = shutdown.clone();
    let logic_handle = thread::spawn(move || {
        LogicThread::run(
            config,
            store,
            Box::new(TerminalBell::new(bell_tx)),
            state_tx,
            shutdown_clone,
        )
    });

    let mut terminal = setup_terminal()?;
    let result = render_loop(&mut terminal, state_rx, bell_rx, &shutdown);

    shutdown.store(true, Ordering::SeqCst);
    let logic_result = logic_handle.join();
    restore_terminal(&mut terminal)?;
    if let Ok(Err(e)) = logic_result {
        return Err(e);
    }
    result
}

fn run_calc(keys: &str) -> Result<()> {
    zlog!("Calc command: keys={:?}", keys);
    let state = run_script(keys)?;
    if let Some(pending) = pending_line(&state) {
        println!("{}", pending);
    }
    println!("{}", present_display(state.display()));
    Ok(())
}

fn run_eat(store: &Store, history: bool) -> Result<()> {
    let mut picker = FoodPicker::from_blob(store.load::<FoodBlob>(food::STORE_KEY));

    if history {
        if picker.history().is_empty() {
            println!("No picks yet.");
        }
        for (idx, name) in picker.history().iter().enumerate() {
            println!("{:>2}. {}", idx + 1, name);
        }
        return Ok(());
    }

    let pick = picker.pick_now(&mut StdRng::from_entropy())?;
    store.save(food::STORE_KEY, &picker.to_blob())?;
    zlog!("Eat command: pick={}", pick);
    println!("今天吃: {}", pick);
    Ok(())
}

fn load_fish(store: &Store, config: &Config) -> WoodenFish {
    let today = chrono::Local::now().date_naive();
    WoodenFish::from_blob(store.load::<FishBlob>(fish::STORE_KEY), today, config.sound)
}

fn print_merit(fish: &WoodenFish) {
    println!("功德: {}", fish.merit());
    println!("今日: {}", fish.today_merit());
}

fn run_knock(store: &Store, config: &Config, count: u64) -> Result<()> {
    let mut fish = load_fish(store, config);
    let mut rng = StdRng::from_entropy();
    let today = chrono::Local::now().date_naive();

    let mut last_blessing = None;
    for _ in 0..count {
        fish.knock(Instant::now(), today, &mut rng);
        last_blessing = fish.floating().last().map(|f| f.text);
    }
    store.save(fish::STORE_KEY, &fish.to_blob())?;
    zlog!("Knock command: count={} merit={}", count, fish.merit());

    if let Some(text) = last_blessing {
        println!("{}", text);
    }
    print_merit(&fish);
    Ok(())
}

fn run_merit(store: &Store, config: &Config, reset: bool, skip_confirm: bool) -> Result<()> {
    let mut fish = load_fish(store, config);

    if reset {
        if !skip_confirm && !confirm("Clear all merit? [y/N] ")? {
            println!("Cancelled.");
            return Ok(());
        }
        fish.reset();
        store.save(fish::STORE_KEY, &fish.to_blob())?;
        zlog!("Merit command: counters cleared");
    }

    print_merit(&fish);
    Ok(())
}

fn run_tone(path: &Path) -> Result<()> {
    tone::write_wav(path, &KNOCK, DEFAULT_SAMPLE_RATE)?;
    zlog!("Tone command: wrote {}", path.display());
    println!("Wrote {}", path.display());
    Ok(())
}

/// Ask on stdin; anything but y/yes declines.
fn confirm(prompt: &str) -> Result<bool> {
    print!("{}", prompt);
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(is_yes(&answer))
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

fn render_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    state_rx: Receiver<RenderState>,
    bell_rx: Receiver<()>,
    shutdown: &AtomicBool,
) -> Result<()> {
    let mut state = RenderState::default();
    let mut last_version: u64 = 0;
    let mut last_frame = Instant::now();
    let mut dirty = true;

    loop {
        if shutdown.load(Ordering::Relaxed) {
            break;
        }

        match state_rx.try_recv() {
            Ok(s) => {
                dirty = dirty || s.version != last_version;
                state = s;
            }
            Err(TryRecvError::Empty) => {}
            Err(TryRecvError::Disconnected) => break,
        }

        // Between frames, so the BEL never splits an escape sequence.
        if bell_rx.try_recv().is_ok() {
            ring_bell(terminal)?;
        }

        if last_frame.elapsed() < FRAME_DURATION {
            thread::sleep(Duration::from_micros(500));
            continue;
        }
        last_frame = Instant::now();

        if dirty {
            terminal.draw(|f| ui::draw(f, &state))?;
            last_version = state.version;
            dirty = false;
        }
    }
    Ok(())
}

fn ring_bell(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    let out = terminal.backend_mut();
    out.write_all(b"\x07")?;
    Ok(out.flush()?)
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    execute!(io::stdout(), EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;
    terminal.hide_cursor()?;
    terminal.clear()?;
    Ok(terminal)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    terminal.show_cursor()?;
    execute!(io::stdout(), LeaveAlternateScreen)?;
    Ok(disable_raw_mode()?)
}
