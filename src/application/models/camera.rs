/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 13/5/25
******************************************************************************/
use serde::{Deserialize, Serialize};
use std::fmt;

/// Device triggered in response to a detection (e.g. a siren or a road sign).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actuator {
    pub id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub actuator_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Camera {
    pub id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub camera_type: String,
    pub enabled: bool,
    #[serde(default)]
    pub actuators: Vec<Actuator>,
}

impl Camera {
    pub fn actuator_names(&self) -> Vec<&str> {
        self.actuators.iter().map(|a| a.name.as_str()).collect()
    }
}

impl fmt::Display for Actuator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        write!(f, "{}", json)
    }
}

impl fmt::Display for Camera {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        write!(f, "{}", json)
    }
}
