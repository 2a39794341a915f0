use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use color_eyre::Result;
use color_eyre::eyre::WrapErr;
use crossterm::event::KeyEventKind;
use sysmon::app::App;
use sysmon::config::{Config, load_config, load_config_from_path};
use sysmon::event::{Event, EventHandler};
use sysmon::logging;
use sysmon::report::{Report, to_json};
use sysmon::system::collector::Collector;
use sysmon::system::pause::PollingPause;
use sysmon::ui;

#[derive(Parser)]
#[command(
    name = "sysmon",
    about = "Terminal system monitor: CPU, memory, disk, network and top processes by RSS"
)]
struct Cli {
    /// Print one snapshot to stdout and exit (non-interactive)
    #[arg(long)]
    snapshot: bool,

    /// Print the snapshot as JSON instead of text
    #[arg(long, requires = "snapshot")]
    json: bool,

    /// Path to config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Refresh rate in milliseconds
    #[arg(long)]
    refresh_rate: Option<u64>,

    /// Mount point whose disk usage is reported
    #[arg(long)]
    mount_point: Option<PathBuf>,

    /// Write logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    let config = load_config_for_cli(&cli);

    if let Some(path) = &config.general.log_file {
        logging::init(path, &config.general.log_level, config.general.log_json)?;
    }

    if cli.snapshot {
        return print_snapshot(&config, cli.json);
    }

    // Establish the processor baseline before touching the terminal so a
    // failure prints a plain diagnostic.
    let app = App::new(&config).wrap_err("cannot read processor counters at startup")?;
    let poll = config.sampling.poll();

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    let mut terminal = ratatui::init();
    let result = runtime.block_on(run(&mut terminal, app, poll));
    ratatui::restore();

    result
}

async fn run(
    terminal: &mut ratatui::DefaultTerminal,
    mut app: App,
    poll: Duration,
) -> Result<()> {
    let mut events = EventHandler::new(poll);

    terminal.draw(|frame| ui::draw(frame, &mut app))?;

    while app.running {
        let Some(event) = events.next().await else {
            break;
        };
        let should_draw = match event {
            Event::Key(key) => {
                if key.kind == KeyEventKind::Press {
                    let action = app.map_key(key);
                    app.dispatch(action);
                    true
                } else {
                    false
                }
            }
            Event::Poll => app.on_poll(),
            Event::Resize => true,
        };
        if should_draw && app.running {
            terminal.draw(|frame| ui::draw(frame, &mut app))?;
        }
    }

    Ok(())
}

fn print_snapshot(config: &Config, json: bool) -> Result<()> {
    let collector = Collector::from_config(&config.sampling);
    let mut pause = PollingPause::uninterruptible(config.sampling.poll());
    let Some(snapshot) = collector
        .one_shot(&mut pause, config.sampling.snapshot_top)
        .wrap_err("cannot read processor counters")?
    else {
        return Ok(());
    };

    if json {
        println!("{}", to_json(&snapshot)?);
    } else {
        print!("{}", Report::new(&snapshot, config.sampling.command_width));
    }
    Ok(())
}

fn load_config_for_cli(cli: &Cli) -> Config {
    let mut config = match &cli.config {
        Some(path) => load_config_from_path(path),
        None => load_config(),
    };

    if let Some(rate) = cli.refresh_rate {
        config.general.refresh_rate_ms = rate;
    }
    if let Some(ref mount_point) = cli.mount_point {
        config.sampling.mount_point = mount_point.clone();
    }
    if let Some(ref log_file) = cli.log_file {
        config.general.log_file = Some(log_file.clone());
    }

    config
}
