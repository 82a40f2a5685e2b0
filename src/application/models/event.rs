/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 13/5/25
******************************************************************************/
use super::camera::Actuator;
use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Animal recognised in a detection, with the classifier's confidence (0..1).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedAnimal {
    pub animal: String,
    pub probability: f64,
}

impl ClassifiedAnimal {
    /// Confidence as a whole percentage, e.g. `0.874` becomes `87`.
    pub fn percentage(&self) -> u8 {
        (self.probability * 100.0).round().clamp(0.0, 100.0) as u8
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionEvent {
    pub id: i64,
    pub camera_id: i64,
    pub detection_img_path: Option<String>,
    pub classification_img_path: Option<String>,
    pub detected_animals: u32,
    pub classification: bool,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub classified_animals: Vec<ClassifiedAnimal>,
    pub timestamp: String,
}

impl DetectionEvent {
    pub fn parsed_timestamp(&self) -> Option<NaiveDateTime> {
        parse_timestamp(&self.timestamp)
    }

    /// The server serves the classification image when there is one, else the
    /// raw detection image.
    pub fn has_image(&self) -> bool {
        self.classification_img_path.is_some() || self.detection_img_path.is_some()
    }

    /// Highest-confidence animal, if any was classified.
    pub fn top_animal(&self) -> Option<&ClassifiedAnimal> {
        self.classified_animals
            .iter()
            .max_by(|a, b| a.probability.total_cmp(&b.probability))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActuationEvent {
    pub actuator: Actuator,
    pub detection_event_id: i64,
    pub command: String,
    pub timestamp: String,
}

impl ActuationEvent {
    pub fn parsed_timestamp(&self) -> Option<NaiveDateTime> {
        parse_timestamp(&self.timestamp)
    }
}

/// Accepts both offset-qualified (RFC 3339) and naive ISO timestamps; the
/// offset form is converted to its local wall-clock time.
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_local());
    }
    value.parse::<NaiveDateTime>().ok()
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
