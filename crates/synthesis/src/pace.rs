use model::Coordinate;

/// Lowest pace ever produced, in minutes per kilometer.
pub const PACE_FLOOR_MIN_PER_KM: f64 = 0.1;

/// Deterministic pseudo-noise in roughly [-1, 1] for the point at `index`.
fn noise(index: usize) -> f64 {
    let seed = index as f64 * 0.1;
    seed.sin() * (1.7 * seed).cos() * (2.3 * seed).sin()
}

/// One pace value per point of `path`, wandering around `target_pace` by at
/// most `variability_percent` of it.
///
/// Paths with fewer than two points have no pace.
pub fn variable_pace(path: &[Coordinate], target_pace: f64, variability_percent: f64) -> Vec<f64> {
    if path.len() < 2 {
        return Vec::new();
    }

    let amplitude = variability_percent / 100.0 * target_pace;
    (0..path.len())
        .map(|i| (target_pace + noise(i) * amplitude).max(PACE_FLOOR_MIN_PER_KM))
        .collect()
}
