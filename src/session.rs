use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{bail, Context, Result};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::clock::ClockSource;
use crate::input::load_route;
use crate::playback::{PlaybackEngine, RouteBuffer};

/// User controls, e.g. typed at the terminal or sent by buttons
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Start,
    Pause,
    Resume,
    Stop,
    Faster,
    Slower,
    /// Raw text from a speed input
    SetSpeed(String),
    Status,
    /// Compute (load) a new route, replacing the current one
    Load(PathBuf),
    Quit,
}

impl FromStr for Command {
    type Err = anyhow::Error;

    fn from_str(line: &str) -> Result<Self> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        let command = match word.to_lowercase().as_str() {
            "start" | "run" | "s" => Command::Start,
            "pause" | "p" => Command::Pause,
            "resume" | "continue" | "r" | "c" => Command::Resume,
            "stop" => Command::Stop,
            "+" | "faster" => Command::Faster,
            "-" | "slower" => Command::Slower,
            "speed" | "v" if !rest.is_empty() => Command::SetSpeed(rest.to_string()),
            "status" | "?" => Command::Status,
            "load" | "route" if !rest.is_empty() => Command::Load(PathBuf::from(rest)),
            "quit" | "exit" | "q" => Command::Quit,
            "" => bail!("Empty command"),
            _ => bail!("Unknown command '{}'", line),
        };
        Ok(command)
    }
}

impl Command {
    /// Apply to the engine; returns a message for the user, if any
    pub fn apply(self, engine: &mut PlaybackEngine, buffer: &RouteBuffer) -> Result<Option<String>> {
        match self {
            Command::Start => engine.start()?,
            Command::Pause => engine.pause()?,
            Command::Resume => engine.resume()?,
            Command::Stop => engine.stop(),
            Command::Faster => {
                engine.speed_mut().increment();
                return Ok(Some(engine.speed().display()));
            }
            Command::Slower => {
                engine.speed_mut().decrement();
                return Ok(Some(engine.speed().display()));
            }
            Command::SetSpeed(input) => {
                engine.speed_mut().set_speed_from_input(&input)?;
                return Ok(Some(engine.speed().display()));
            }
            Command::Status => return Ok(Some(engine.snapshot().to_string())),
            Command::Load(path) => {
                let loaded = load_route(&path)?;
                buffer
                    .set_route(loaded.coordinates, loaded.triggers)
                    .with_context(|| format!("Route in {} rejected", path.display()))?;
                return Ok(Some(format!("Route loaded from {}", path.display())));
            }
            Command::Quit => {}
        }
        Ok(None)
    }
}

/// Why a session loop returned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    Quit,
    CommandsClosed,
    ClockStopped,
}

/// Drive `engine` from `clock` ticks and user `commands` until told to quit.
///
/// A tick is awaited only while the engine has a frame requested, so there
/// is never more than one outstanding. Commands take priority over ticks.
/// Rejected commands are logged and the session carries on. Once the command
/// channel closes, playback continues until the engine stops requesting
/// frames or the clock runs out.
pub async fn run<C>(
    engine: &mut PlaybackEngine,
    buffer: &RouteBuffer,
    clock: &mut C,
    commands: &mut mpsc::Receiver<Command>,
) -> SessionEnd
where
    C: ClockSource + ?Sized,
{
    let mut commands_open = true;

    loop {
        let command = match (engine.frame_requested(), commands_open) {
            (true, true) => tokio::select! {
                biased;
                command = commands.recv() => command,
                tick = clock.next_frame() => {
                    if !deliver(engine, tick) {
                        return SessionEnd::ClockStopped;
                    }
                    continue;
                }
            },
            (true, false) => {
                if !deliver(engine, clock.next_frame().await) {
                    return SessionEnd::ClockStopped;
                }
                continue;
            }
            (false, true) => commands.recv().await,
            (false, false) => return SessionEnd::CommandsClosed,
        };

        let Some(command) = command else {
            debug!("Command channel closed");
            commands_open = false;
            continue;
        };
        if command == Command::Quit {
            return SessionEnd::Quit;
        }

        debug!("Applying {:?}", command);
        match command.apply(engine, buffer) {
            Ok(Some(message)) => info!("{}", message),
            Ok(None) => {}
            Err(e) => warn!("{:#}", e),
        }
    }
}

/// Hand a tick to the engine; false once the clock has stopped
fn deliver(engine: &mut PlaybackEngine, tick: Option<f64>) -> bool {
    match tick {
        Some(timestamp) => {
            engine.on_frame(timestamp);
            true
        }
        None => {
            debug!("Clock stopped");
            false
        }
    }
}
