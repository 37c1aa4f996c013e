use anyhow::{bail, Context, Result};
use ridealong::clock::IntervalClock;
use ridealong::input::load_route;
use ridealong::session::{self, Command};
use ridealong::settings::Settings;
use ridealong::sink::{ChannelSink, PlaybackEvent};
use ridealong::{PlaybackEngine, RouteBuffer, SpeedController};
use std::io::BufRead;
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{info, trace, warn};
use tracing_subscriber::EnvFilter;

const USAGE: &str = "\
Usage: ridealong [ROUTE_FILE] [--speed KMH] [--frame-interval MS] [--autostart]

ROUTE_FILE is a routing result (JSON) or a lat,lng[,instruction] CSV.";

const CONTROLS: &str = "\
Controls: start | pause | resume | stop | + | - | speed <kmh> | status | load <file> | quit";

/// Command line options; anything not given falls back to the settings file
#[derive(Debug, Default, PartialEq)]
struct CliArgs {
    route: Option<PathBuf>,
    speed: Option<String>,
    frame_interval_ms: Option<u64>,
    autostart: bool,
}

impl CliArgs {
    /// Returns None when help was requested
    fn parse(mut args: impl Iterator<Item = String>) -> Result<Option<Self>> {
        let mut cli = CliArgs::default();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "-h" | "--help" => return Ok(None),
                "--speed" => cli.speed = Some(args.next().context("--speed needs a value")?),
                "--frame-interval" => {
                    let value = args.next().context("--frame-interval needs a value")?;
                    cli.frame_interval_ms = Some(
                        value
                            .parse()
                            .with_context(|| format!("Bad frame interval '{}'", value))?,
                    );
                }
                "--autostart" => cli.autostart = true,
                flag if flag.starts_with('-') => bail!("Unknown option '{}'\n\n{}", flag, USAGE),
                path => {
                    if cli.route.is_some() {
                        bail!("Only one route file can be given");
                    }
                    cli.route = Some(PathBuf::from(path));
                }
            }
        }

        Ok(Some(cli))
    }
}

/// Print narration and trace marker movement
async fn report_events(mut events: mpsc::UnboundedReceiver<PlaybackEvent>, to_stdout: bool) {
    while let Some(event) = events.recv().await {
        match event {
            PlaybackEvent::Position(position) => {
                trace!("Marker at ({:.6}, {:.6})", position.lat, position.lng);
            }
            PlaybackEvent::Narration { text, at } => {
                info!("Instruction: {}", text);
                if to_stdout {
                    println!("[{}] {}", at.format("%H:%M:%S"), text);
                }
            }
        }
    }
}

/// Read commands from stdin on a dedicated thread
fn spawn_stdin_reader(tx: mpsc::Sender<Command>) {
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if line.trim().is_empty() {
                continue;
            }
            match line.parse::<Command>() {
                Ok(command) => {
                    if tx.blocking_send(command).is_err() {
                        break;
                    }
                }
                Err(e) => warn!("{}", e),
            }
        }
    });
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let Some(args) = CliArgs::parse(std::env::args().skip(1))? else {
        println!("{}", USAGE);
        return Ok(());
    };

    let mut settings = Settings::load();
    if let Some(ms) = args.frame_interval_ms {
        settings.frame_interval_ms = ms;
    }

    let mut speed = SpeedController::new(settings.speed_kmh).unwrap_or_default();
    if let Some(input) = &args.speed {
        speed.set_speed_from_input(input)?;
    }

    let buffer = RouteBuffer::new();
    if let Some(path) = &args.route {
        let loaded = load_route(path)?;
        buffer
            .set_route(loaded.coordinates, loaded.triggers)
            .with_context(|| format!("Route in {} rejected", path.display()))?;
    }

    let (sink, events) = ChannelSink::channel();
    let mut engine = PlaybackEngine::new(&buffer, speed, Box::new(sink.clone()), Box::new(sink));
    tokio::spawn(report_events(events, settings.narrate_to_stdout));

    let (tx, mut commands) = mpsc::channel(32);
    spawn_stdin_reader(tx);
    println!("{}", CONTROLS);

    if args.autostart {
        if let Err(e) = engine.start() {
            warn!("{}", e);
        }
    }

    let mut clock = IntervalClock::new(Duration::from_millis(settings.frame_interval_ms));
    let end = session::run(&mut engine, &buffer, &mut clock, &mut commands).await;
    info!("Session ended ({:?})", end);

    settings.speed_kmh = engine.speed().speed_kmh();
    if let Err(e) = settings.save() {
        warn!("Failed to save settings: {:#}", e);
    }

    Ok(())
}
