use futures::{stream, StreamExt};
use log::debug;
use model::{elevation::ElevationProfile, Coordinate};
use routing::TerrainService;

/// Terrain queries in flight at once while annotating a path.
pub const DEFAULT_CONCURRENCY: usize = 16;

/// Looks up the terrain height of every coordinate of `path`.
///
/// Queries run concurrently, at most `concurrency` at a time, and the results
/// keep the order of the path. A point without a known height, or whose query
/// failed, gets an elevation of 0; the batch itself never fails.
pub async fn annotate<T>(terrain: &T, path: &[Coordinate], concurrency: usize) -> ElevationProfile
where
    T: TerrainService + ?Sized,
{
    let elevations = stream::iter(path.iter().copied())
        .map(|coordinate| async move {
            match terrain.elevation(coordinate).await {
                Ok(Some(elevation)) => elevation,
                Ok(None) => {
                    debug!("No terrain data at {:?}", coordinate);
                    0.0
                }
                Err(err) => {
                    debug!("Elevation query at {:?} failed: {}", coordinate, err);
                    0.0
                }
            }
        })
        .buffered(concurrency.max(1))
        .collect::<Vec<_>>()
        .await;

    ElevationProfile::new(elevations)
}

/// Total climb: the sum of all positive steps between consecutive samples.
pub fn elevation_gain(elevations: &[f64]) -> f64 {
    elevations
        .windows(2)
        .map(|pair| (pair[1] - pair[0]).max(0.0))
        .sum()
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use routing::ApiError;

    use super::*;

    /// Height equals longitude; negative longitudes fail, zero is unknown.
    struct SlopedTerrain {
        queries: AtomicUsize,
    }

    #[async_trait]
    impl TerrainService for SlopedTerrain {
        async fn elevation(&self, coordinate: Coordinate) -> Result<Option<f64>, ApiError> {
            self.queries.fetch_add(1, Ordering::SeqCst);
            // finish later queries first to exercise ordering
            tokio::time::sleep(std::time::Duration::from_millis(
                (50.0 - coordinate.longitude).max(0.0) as u64,
            ))
            .await;
            if coordinate.longitude < 0.0 {
                Err(ApiError::Other("terrain offline".to_owned()))
            } else if coordinate.longitude == 0.0 {
                Ok(None)
            } else {
                Ok(Some(coordinate.longitude))
            }
        }
    }

    #[test]
    fn test_elevation_gain() {
        assert_eq!(elevation_gain(&[]), 0.0);
        assert_eq!(elevation_gain(&[0.0, 10.0, 20.0, 30.0]), 30.0);
        assert_eq!(elevation_gain(&[30.0, 20.0, 10.0, 0.0]), 0.0);
        assert_eq!(elevation_gain(&[0.0, 10.0, 5.0, 15.0]), 20.0);
    }

    #[tokio::test]
    async fn test_annotate_keeps_path_order() {
        let terrain = SlopedTerrain {
            queries: AtomicUsize::new(0),
        };
        let path: Vec<Coordinate> = (1..=20)
            .map(|i| Coordinate::new(i as f64, 40.0))
            .collect();

        let profile = annotate(&terrain, &path, 4).await;
        let expected: Vec<f64> = (1..=20).map(|i| i as f64).collect();
        assert_eq!(profile.as_slice(), expected.as_slice());
        assert_eq!(terrain.queries.load(Ordering::SeqCst), 20);
    }

    #[tokio::test]
    async fn test_failed_and_unknown_points_become_zero() {
        let terrain = SlopedTerrain {
            queries: AtomicUsize::new(0),
        };
        let path = [
            Coordinate::new(12.0, 40.0),
            Coordinate::new(-3.0, 40.0),
            Coordinate::new(0.0, 40.0),
            Coordinate::new(7.5, 40.0),
        ];

        let profile = annotate(&terrain, &path, DEFAULT_CONCURRENCY).await;
        assert_eq!(profile.as_slice(), &[12.0, 0.0, 0.0, 7.5]);
        assert!(profile.has_data(&path));
    }

    #[tokio::test]
    async fn test_annotate_empty_path() {
        let terrain = SlopedTerrain {
            queries: AtomicUsize::new(0),
        };
        assert!(annotate(&terrain, &[], 0).await.is_empty());
    }
}
