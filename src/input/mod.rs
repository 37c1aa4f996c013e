pub mod csv;
pub mod json;

pub use self::csv::load_csv;
pub use self::json::load_json;

use anyhow::{Context, Result};
use std::path::Path;
use tracing::debug;

use crate::core::{Coordinate, InstructionTrigger};

/// Unvalidated route as produced by a routing service
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RouteInput {
    pub coordinates: Vec<Coordinate>,
    pub triggers: Vec<InstructionTrigger>,
}

/// Input format detection result
#[derive(Debug, Clone, PartialEq)]
pub enum InputFormat {
    Json,
    Csv,
    Unknown,
}

/// Detect the format of a route file from its first bytes
pub fn detect_format(data: &[u8]) -> InputFormat {
    if is_json(data) {
        return InputFormat::Json;
    }

    if is_csv(data) {
        return InputFormat::Csv;
    }

    InputFormat::Unknown
}

fn is_json(data: &[u8]) -> bool {
    matches!(
        data.iter().find(|b| !b.is_ascii_whitespace()),
        Some(b'{') | Some(b'[')
    )
}

fn is_csv(data: &[u8]) -> bool {
    // Header plus at least one row, each with a comma
    let sample = &data[..data.len().min(500)];
    match std::str::from_utf8(sample) {
        Ok(text) => {
            let mut lines = text.lines().filter(|line| !line.trim().is_empty());
            matches!(
                (lines.next(), lines.next()),
                (Some(header), Some(row)) if header.contains(',') && row.contains(',')
            )
        }
        // Cut mid-character; let the CSV reader decide
        Err(e) => e.valid_up_to() > 0 && sample[..e.valid_up_to()].contains(&b','),
    }
}

/// Load a route from a file, auto-detecting format
pub fn load_route(path: &Path) -> Result<RouteInput> {
    let data = std::fs::read(path)
        .with_context(|| format!("Failed to read route file {}", path.display()))?;

    let format = detect_format(&data);
    debug!("Loading route from {} as {:?}", path.display(), format);

    match format {
        InputFormat::Json => load_json(&data),
        InputFormat::Csv => load_csv(&data),
        InputFormat::Unknown => anyhow::bail!("Unknown route format in {}", path.display()),
    }
}
