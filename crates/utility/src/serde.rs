pub mod time_of_day {
    use core::fmt;

    use chrono::NaiveTime;
    use schemars::gen::SchemaGenerator;
    use schemars::schema::{InstanceType, Schema, SchemaObject};
    use serde::{
        de::{self, Unexpected, Visitor},
        Deserializer, Serializer,
    };

    pub fn serialize<S>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&time.format("%H:%M").to_string())
    }

    /// Accepts `HH:MM` as produced by time inputs, and `HH:MM:SS`.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct TimeVisitor;

        impl<'de> Visitor<'de> for TimeVisitor {
            type Value = NaiveTime;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a string in the format HH:MM")
            }

            fn visit_str<E>(self, value: &str) -> Result<NaiveTime, E>
            where
                E: de::Error,
            {
                NaiveTime::parse_from_str(value, "%H:%M")
                    .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
                    .map_err(|_| de::Error::invalid_value(Unexpected::Str(value), &self))
            }
        }

        deserializer.deserialize_str(TimeVisitor)
    }

    pub fn schema(_gen: &mut SchemaGenerator) -> Schema {
        SchemaObject {
            instance_type: Some(InstanceType::String.into()),
            format: Some("HH:MM".to_owned()),
            ..Default::default()
        }
        .into()
    }
}

pub mod duration {
    use chrono::Duration;
    use schemars::gen::SchemaGenerator;
    use schemars::schema::{InstanceType, Schema, SchemaObject};
    use serde::de::Error as DeError;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let total_seconds = duration.num_seconds();
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;

        let formatted = format!("{:02}:{:02}:{:02}", hours, minutes, seconds);
        serializer.serialize_str(&formatted)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let parts: Vec<&str> = s.split(':').collect();

        if parts.len() != 3 {
            return Err(D::Error::invalid_length(
                parts.len(),
                &"Expected format hh:mm:ss",
            ));
        }

        let hours: i64 = parts[0].parse().map_err(D::Error::custom)?;
        let minutes: i64 = parts[1].parse().map_err(D::Error::custom)?;
        let seconds: i64 = parts[2].parse().map_err(D::Error::custom)?;

        Ok(Duration::hours(hours)
            + Duration::minutes(minutes)
            + Duration::seconds(seconds))
    }

    pub fn schema(_gen: &mut SchemaGenerator) -> Schema {
        SchemaObject {
            instance_type: Some(InstanceType::String.into()),
            format: Some("hh:mm:ss".to_owned()),
            ..Default::default()
        }
        .into()
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, NaiveTime};
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Start {
        #[serde(with = "super::time_of_day")]
        time: NaiveTime,
    }

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Elapsed {
        #[serde(with = "super::duration")]
        duration: Duration,
    }

    #[test]
    fn test_time_of_day() {
        let start: Start = serde_json::from_str(r#"{"time":"07:00"}"#).unwrap();
        assert_eq!(start.time, NaiveTime::from_hms_opt(7, 0, 0).unwrap());
        assert_eq!(serde_json::to_string(&start).unwrap(), r#"{"time":"07:00"}"#);

        let start: Start = serde_json::from_str(r#"{"time":"18:45:30"}"#).unwrap();
        assert_eq!(start.time, NaiveTime::from_hms_opt(18, 45, 30).unwrap());

        assert!(serde_json::from_str::<Start>(r#"{"time":"7 o'clock"}"#).is_err());
    }

    #[test]
    fn test_duration() {
        let elapsed = Elapsed {
            duration: Duration::seconds(3 * 3600 + 25 * 60 + 7),
        };
        let json = serde_json::to_string(&elapsed).unwrap();
        assert_eq!(json, r#"{"duration":"03:25:07"}"#);
        assert_eq!(serde_json::from_str::<Elapsed>(&json).unwrap(), elapsed);
    }
}
