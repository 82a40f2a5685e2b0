/******************************************************************************
    Author: Joaquín Béjar García
    Email: jb@taunais.com
    Date: 12/5/25
 ******************************************************************************/
use reqwest::StatusCode;
use std::fmt::{Display, Formatter};
use std::{fmt, io};

/// Error surfaced by [`crate::application::client::RetryingSessionClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// The token was rejected even after one refresh, or the refresh itself failed.
    Unauthorized,
    /// Non-authorization failure on the first attempt, with a displayable detail.
    Other(String),
    /// Any failure on the retried attempt that is not an authorization failure.
    Unknown,
}

impl Display for ClientError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ClientError::Unauthorized => write!(f, "unauthorized"),
            ClientError::Other(detail) => write!(f, "request failed: {detail}"),
            ClientError::Unknown => write!(f, "unknown error"),
        }
    }
}

impl std::error::Error for ClientError {}

impl From<serde_json::Error> for ClientError {
    fn from(e: serde_json::Error) -> Self {
        ClientError::Other(format!("json error: {e}"))
    }
}

impl From<csv::Error> for ClientError {
    fn from(e: csv::Error) -> Self {
        ClientError::Other(format!("csv error: {e}"))
    }
}

/// Failure of a token refresh exchange. Cloneable so a single in-flight
/// refresh can hand the same outcome to every waiting caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshError {
    /// No refresh token is stored; no network call was made.
    Missing,
    /// The refresh endpoint could not be reached or the call timed out.
    Unreachable(String),
    /// The refresh endpoint answered with a non-success status.
    Rejected(StatusCode),
}

impl Display for RefreshError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            RefreshError::Missing => write!(f, "refresh token not found"),
            RefreshError::Unreachable(msg) => write!(f, "refresh endpoint unreachable: {msg}"),
            RefreshError::Rejected(s) => write!(f, "refresh rejected with http status: {s}"),
        }
    }
}

impl std::error::Error for RefreshError {}

impl From<reqwest::Error> for RefreshError {
    fn from(e: reqwest::Error) -> Self {
        RefreshError::Unreachable(e.to_string())
    }
}

#[derive(Debug)]
pub enum AuthError {
    MissingCredentials,
    BadCredentials,
    Network(reqwest::Error),
    Json(serde_json::Error),
    Unexpected(StatusCode),
}

impl Display for AuthError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::MissingCredentials => write!(f, "all fields are required"),
            AuthError::BadCredentials => write!(f, "invalid credentials"),
            AuthError::Network(e) => write!(f, "network error: {e}"),
            AuthError::Json(e) => write!(f, "json error: {e}"),
            AuthError::Unexpected(s) => write!(f, "unexpected http status: {s}"),
        }
    }
}

impl std::error::Error for AuthError {}

impl From<reqwest::Error> for AuthError {
    fn from(e: reqwest::Error) -> Self {
        AuthError::Network(e)
    }
}
impl From<serde_json::Error> for AuthError {
    fn from(e: serde_json::Error) -> Self {
        AuthError::Json(e)
    }
}

#[derive(Debug)]
pub enum StorageError {
    Io(io::Error),
    Json(serde_json::Error),
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::Io(e) => write!(f, "io error: {e}"),
            StorageError::Json(e) => write!(f, "json error: {e}"),
        }
    }
}

impl std::error::Error for StorageError {}

impl From<io::Error> for StorageError {
    fn from(e: io::Error) -> Self {
        StorageError::Io(e)
    }
}
impl From<serde_json::Error> for StorageError {
    fn from(e: serde_json::Error) -> Self {
        StorageError::Json(e)
    }
}
