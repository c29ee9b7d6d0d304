use chrono::{DateTime, Local, NaiveDate, NaiveTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::ExampleData;

pub const DEFAULT_RUN_NAME: &str = "Morning Run";

/// Descriptive data of a run, supplied when the track is exported.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RunMetadata {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default = "default_date")]
    pub date: NaiveDate,
    #[serde(
        default = "default_time",
        with = "utility::serde::time_of_day"
    )]
    #[schemars(schema_with = "utility::serde::time_of_day::schema")]
    pub time: NaiveTime,
    pub description: Option<String>,
}

fn default_name() -> String {
    DEFAULT_RUN_NAME.to_owned()
}

fn default_date() -> NaiveDate {
    Local::now().date_naive()
}

fn default_time() -> NaiveTime {
    NaiveTime::from_hms_opt(7, 0, 0).unwrap_or(NaiveTime::MIN)
}

impl RunMetadata {
    /// Start of the run: date and time of day read in the local time zone.
    ///
    /// A wall-clock time skipped by a DST transition is read as UTC instead.
    pub fn start_instant(&self) -> DateTime<Utc> {
        let naive = self.date.and_time(self.time);
        naive
            .and_local_timezone(Local)
            .earliest()
            .map(|local| local.with_timezone(&Utc))
            .unwrap_or_else(|| naive.and_utc())
    }
}

impl Default for RunMetadata {
    fn default() -> Self {
        Self {
            name: default_name(),
            date: default_date(),
            time: default_time(),
            description: None,
        }
    }
}

impl ExampleData for RunMetadata {
    fn example_data() -> Self {
        Self {
            name: "Bridge Loop".to_owned(),
            date: NaiveDate::from_ymd_opt(2024, 5, 12).unwrap_or(NaiveDate::MIN),
            time: default_time(),
            description: Some("Easy recovery run along the waterfront".to_owned()),
        }
    }
}
