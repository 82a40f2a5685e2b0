/******************************************************************************
    Author: Joaquín Béjar García
    Email: jb@taunais.com
    Date: 7/9/24
 ******************************************************************************/
use serde::{Deserialize, Serialize};
use std::fmt;

/// Access and refresh tokens as persisted between runs.
///
/// The field names match the keys the dashboard has always stored them under,
/// so a session document written by one client can be read by another.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    #[serde(rename = "accessToken", default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(rename = "refreshToken", default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
}

impl Session {
    pub fn new(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self {
            access_token: Some(access_token.into()),
            refresh_token: Some(refresh_token.into()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.access_token.is_none() && self.refresh_token.is_none()
    }
}

impl fmt::Display for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |token: &Option<String>| {
            token
                .as_ref()
                .map_or("null".to_string(), |_| "\"[REDACTED]\"".to_string())
        };
        write!(
            f,
            "{{\"access_token\":{},\"refresh_token\":{}}}",
            redact(&self.access_token),
            redact(&self.refresh_token)
        )
    }
}
