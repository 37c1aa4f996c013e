use anyhow::{Context, Result};

use crate::core::{Coordinate, InstructionTrigger};
use crate::input::RouteInput;

/// Load a route from CSV
///
/// Supports flexible column names:
/// - lat,lng
/// - latitude,longitude,instruction
/// - lat,lon,text
///
/// A non-empty instruction cell becomes a trigger at that row's coordinate.
pub fn load_csv(data: &[u8]) -> Result<RouteInput> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(data);

    let headers = rdr.headers()?.clone();
    let (lat_idx, lng_idx) = detect_columns(&headers)?;
    let text_idx = find_column(&headers, &["instruction", "text", "narration"]).ok();

    let mut route = RouteInput::default();

    for (row, result) in rdr.records().enumerate() {
        let record = result.with_context(|| format!("Failed to read CSV row {}", row + 1))?;

        let lat = parse_degrees(&record, lat_idx)
            .with_context(|| format!("Bad latitude in row {}", row + 1))?;
        let lng = parse_degrees(&record, lng_idx)
            .with_context(|| format!("Bad longitude in row {}", row + 1))?;

        let index = route.coordinates.len();
        route.coordinates.push(Coordinate::new(lat, lng));

        if let Some(text) = text_idx.and_then(|idx| record.get(idx)).filter(|t| !t.is_empty()) {
            route.triggers.push(InstructionTrigger::new(index, text));
        }
    }

    Ok(route)
}

fn parse_degrees(record: &csv::StringRecord, idx: usize) -> Result<f64> {
    let cell = record.get(idx).context("Missing column")?;
    cell.parse::<f64>()
        .with_context(|| format!("'{}' is not a number", cell))
}

/// Detect coordinate column indices from CSV headers
fn detect_columns(headers: &csv::StringRecord) -> Result<(usize, usize)> {
    let lat_idx = find_column(headers, &["lat", "latitude", "y"])?;
    let lng_idx = find_column(headers, &["lng", "lon", "long", "longitude", "x"])?;

    Ok((lat_idx, lng_idx))
}

/// Find a column by checking possible names
fn find_column(headers: &csv::StringRecord, names: &[&str]) -> Result<usize> {
    for (idx, header) in headers.iter().enumerate() {
        let header_lower = header.to_lowercase();
        if names.iter().any(|&name| header_lower == name) {
            return Ok(idx);
        }
    }

    anyhow::bail!("Could not find column with names: {:?}", names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Route;
    use crate::error::PlaybackError;

    #[test]
    fn test_load_csv_with_instructions() {
        let data = b"Latitude, Longitude, Instruction\n\
                     0.0, 0.0, Head east\n\
                     0.0, 0.001, Turn left\n\
                     0.0, 0.002,\n";

        let route = load_csv(data).unwrap();
        assert_eq!(route.coordinates.len(), 3);
        assert_eq!(route.coordinates[1], Coordinate::new(0.0, 0.001));
        assert_eq!(
            route.triggers,
            vec![
                InstructionTrigger::new(0, "Head east"),
                InstructionTrigger::new(1, "Turn left"),
            ]
        );
    }

    #[test]
    fn test_load_csv_coordinates_only() {
        let route = load_csv(b"lon,lat\n11.0767,49.4521\n").unwrap();
        assert_eq!(route.coordinates, vec![Coordinate::new(49.4521, 11.0767)]);
        assert!(route.triggers.is_empty());
    }

    #[test]
    fn test_missing_columns() {
        let err = load_csv(b"north,east\n1,2\n").unwrap_err();
        assert!(err.to_string().contains("Could not find column"));
    }

    #[test]
    fn test_nan_row_rejected_by_route() {
        let loaded = load_csv(b"lat,lng\n0.0,0.0\nNaN,0.001\n0.0,0.002\n").unwrap();
        assert_eq!(loaded.coordinates.len(), 3);

        let err = Route::new(loaded.coordinates, loaded.triggers).unwrap_err();
        assert_eq!(err, PlaybackError::InvalidCoordinate { position: 1 });
    }

    #[test]
    fn test_bad_number() {
        let err = load_csv(b"lat,lng\n49.45,eleven\n").unwrap_err();
        assert!(err.to_string().contains("row 1"));
    }
}
