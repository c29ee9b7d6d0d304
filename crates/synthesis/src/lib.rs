//! Turns a drawn path into a synthetic run: pace, timestamps, elevations,
//! and the exported track file.

pub mod elevation;
pub mod export;
pub mod gpx;
pub mod pace;
pub mod profile;
pub mod summary;
pub mod timing;

pub use elevation::{annotate, elevation_gain};
pub use export::{build_track, export_file_name, export_track, ExportError, TrackExport};
pub use gpx::{GpxWriter, TrackSerializer};
pub use pace::variable_pace;
pub use profile::{profile_series, to_csv, ProfileRow};
pub use summary::summarize;
pub use timing::{time_offsets, timestamps};
