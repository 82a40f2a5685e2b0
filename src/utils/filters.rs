use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub type QueryParams = Vec<(String, String)>;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Filters of the detection events table and its CSV export.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectionFilter {
    pub camera_ids: Vec<i64>,
    pub classified_animals: Vec<String>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}

/// Filters of the actuation events table and its CSV export.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActuationFilter {
    /// Restricts to actuations triggered by one detection event.
    pub detection_id: Option<i64>,
    pub actuator_types: Vec<String>,
    pub commands: Vec<String>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}

impl DetectionFilter {
    pub fn to_query(&self) -> QueryParams {
        let mut params = QueryParams::new();
        params.extend(
            self.camera_ids
                .iter()
                .map(|id| ("camera_ids".to_string(), id.to_string())),
        );
        params.extend(
            self.classified_animals
                .iter()
                .map(|animal| ("classified_animals".to_string(), animal.clone())),
        );
        push_dates(&mut params, self.date_from, self.date_to);
        params
    }

    pub fn to_page_query(&self, offset: u64) -> QueryParams {
        with_offset(self.to_query(), offset)
    }
}

impl ActuationFilter {
    pub fn for_detection(detection_id: i64) -> Self {
        Self {
            detection_id: Some(detection_id),
            ..Self::default()
        }
    }

    pub fn to_query(&self) -> QueryParams {
        let mut params = QueryParams::new();
        // id 0 never names a real event
        if let Some(id) = self.detection_id.filter(|id| *id != 0) {
            params.push(("detection_id".to_string(), id.to_string()));
        }
        params.extend(
            self.actuator_types
                .iter()
                .map(|t| ("actuator_types".to_string(), t.clone())),
        );
        params.extend(
            self.commands
                .iter()
                .map(|c| ("commands".to_string(), c.clone())),
        );
        push_dates(&mut params, self.date_from, self.date_to);
        params
    }

    pub fn to_page_query(&self, offset: u64) -> QueryParams {
        with_offset(self.to_query(), offset)
    }
}

fn push_dates(params: &mut QueryParams, from: Option<NaiveDate>, to: Option<NaiveDate>) {
    if let Some(from) = from {
        params.push(("date_from".to_string(), from.format(DATE_FORMAT).to_string()));
    }
    if let Some(to) = to {
        params.push(("date_to".to_string(), to.format(DATE_FORMAT).to_string()));
    }
}

fn with_offset(mut params: QueryParams, offset: u64) -> QueryParams {
    params.push(("offset".to_string(), offset.to_string()));
    params
}
