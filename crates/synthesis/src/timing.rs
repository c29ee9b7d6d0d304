use chrono::{DateTime, Duration, Utc};
use model::{geometry::distance, Coordinate};

/// Seconds from the start at which each point of `path` is reached.
///
/// Segment `j` (from point `j - 1` to point `j`) is run at `paces[j - 1]`
/// minutes per kilometer; a missing pace counts as 0. Offsets are one running
/// sum accumulated left to right.
pub fn time_offsets(path: &[Coordinate], paces: &[f64]) -> Vec<f64> {
    let mut elapsed = 0.0;
    let mut offsets = Vec::with_capacity(path.len());
    if !path.is_empty() {
        offsets.push(elapsed);
    }

    for (j, pair) in path.windows(2).enumerate() {
        elapsed += segment_seconds(&pair[0], &pair[1], paces.get(j).copied().unwrap_or(0.0));
        offsets.push(elapsed);
    }
    offsets
}

fn segment_seconds(from: &Coordinate, to: &Coordinate, pace: f64) -> f64 {
    distance(from, to) / 1000.0 * pace * 60.0
}

/// Instants at which each point of `path` is reached when starting at
/// `start`, truncated to whole milliseconds.
pub fn timestamps(path: &[Coordinate], paces: &[f64], start: DateTime<Utc>) -> Vec<DateTime<Utc>> {
    time_offsets(path, paces)
        .into_iter()
        .map(|seconds| start + Duration::milliseconds((seconds * 1000.0) as i64))
        .collect()
}
