use std::path::PathBuf;

use clap::Parser;
use color_eyre::Result;
use color_eyre::eyre::eyre;
use crossterm::event::KeyEventKind;
use serde::Serialize;
use tracing::info;

use topcpu::app::App;
use topcpu::config::{self, load_config, load_config_from_path};
use topcpu::event::{Event, EventHandler};
use topcpu::logging::init_tracing;
use topcpu::system::snapshot::TickReport;
use topcpu::ui;

#[derive(Parser)]
#[command(
    name = "topcpu",
    about = "Live terminal view of system load and the busiest processes"
)]
struct Cli {
    /// Path to config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Refresh interval in seconds (1-10)
    #[arg(long)]
    refresh_secs: Option<u64>,

    /// Number of processes to show
    #[arg(long)]
    top: Option<usize>,

    /// Root of the procfs mount to read; CPU model and core count always
    /// come from the local host
    #[arg(long)]
    proc_root: Option<PathBuf>,

    /// Write logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Print one JSON line per tick instead of drawing the dashboard.
    #[arg(long, default_value_t = false)]
    batch: bool,

    /// Number of ticks to print in batch mode.
    #[arg(long, default_value_t = 3)]
    iterations: usize,
}

#[derive(Serialize)]
struct BatchRecord<'a> {
    tick: usize,
    refresh_secs: u64,
    #[serde(flatten)]
    report: &'a TickReport,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    let config = load_config_for_cli(&cli);
    init_tracing(&config.logging)?;

    if cli.batch {
        return run_batch(config, cli.iterations).await;
    }

    let mut terminal = ratatui::init();
    let result = run(&mut terminal, config).await;
    ratatui::restore();

    result
}

async fn run(terminal: &mut ratatui::DefaultTerminal, config: config::Config) -> Result<()> {
    let mut app = App::new(config);
    let mut events = EventHandler::new(app.refresh_interval());
    info!(refresh_secs = app.refresh_secs, "dashboard started");

    app.tick();
    terminal.draw(|frame| ui::draw(frame, &app))?;

    while app.running {
        let Some(event) = events.next().await else {
            break;
        };
        match event {
            Event::Key(key) => {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                let action = app.map_key(key);
                app.dispatch(action);
                events.set_tick_rate(app.refresh_interval());
            }
            Event::Tick => app.tick(),
            Event::Resize => {}
        }
        if app.running {
            terminal.draw(|frame| ui::draw(frame, &app))?;
        }
    }

    info!("dashboard stopped");
    Ok(())
}

async fn run_batch(config: config::Config, iterations: usize) -> Result<()> {
    if iterations == 0 {
        return Err(eyre!("--iterations must be greater than 0"));
    }

    let mut app = App::new(config);
    for tick in 0..iterations {
        if tick > 0 {
            tokio::time::sleep(app.refresh_interval()).await;
        }
        app.tick();
        let record = BatchRecord {
            tick,
            refresh_secs: app.refresh_secs,
            report: &app.report,
        };
        println!("{}", serde_json::to_string(&record)?);
    }
    Ok(())
}

fn load_config_for_cli(cli: &Cli) -> config::Config {
    let mut config = match &cli.config {
        Some(path) => load_config_from_path(path),
        None => load_config(),
    };

    if let Some(secs) = cli.refresh_secs {
        config.general.refresh_secs = secs;
    }
    if let Some(top) = cli.top {
        config.general.top_n = top;
    }
    if let Some(ref root) = cli.proc_root {
        config.general.proc_root = root.clone();
    }
    if let Some(ref file) = cli.log_file {
        config.logging.file = Some(file.clone());
    }

    config
}
