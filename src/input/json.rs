use anyhow::{Context, Result};
use serde::Deserialize;

use crate::core::{Coordinate, InstructionTrigger};
use crate::input::RouteInput;

/// A single routing result: the path plus its turn-by-turn instructions
///
/// Instructions may carry extra fields (distance, road name, ...); only
/// `index` and `text` are used.
#[derive(Debug, Deserialize)]
struct RoutingResult {
    coordinates: Vec<Coordinate>,
    #[serde(default)]
    instructions: Vec<InstructionTrigger>,
}

/// Either a bare result or the list a routing service answers with
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RoutingResponse {
    Single(RoutingResult),
    Alternatives { routes: Vec<RoutingResult> },
    List(Vec<RoutingResult>),
}

/// Parse a routing result; with several alternatives the first one wins
pub fn load_json(data: &[u8]) -> Result<RouteInput> {
    let response: RoutingResponse =
        serde_json::from_slice(data).context("Failed to parse routing result JSON")?;

    let result = match response {
        RoutingResponse::Single(result) => result,
        RoutingResponse::Alternatives { routes } | RoutingResponse::List(routes) => routes
            .into_iter()
            .next()
            .context("Routing result contains no routes")?,
    };

    Ok(RouteInput {
        coordinates: result.coordinates,
        triggers: result.instructions,
    })
}
