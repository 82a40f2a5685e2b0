/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 7/9/24
******************************************************************************/

/// Persisted key of the access token.
pub const ACCESS_TOKEN_KEY: &str = "accessToken";
/// Persisted key of the refresh token.
pub const REFRESH_TOKEN_KEY: &str = "refreshToken";

pub(crate) const ACCESS_TOKEN_HEADER: &str = "x-access-token";

pub(crate) const LOGIN_ENDPOINT: &str = "api/v1/login";
pub(crate) const REFRESH_ENDPOINT: &str = "api/v1/token/refresh";
pub(crate) const CAMERAS_ENDPOINT: &str = "api/v1/cameras";
pub(crate) const ANIMALS_ENDPOINT: &str = "api/v1/animals";
pub(crate) const ACTUATOR_TYPES_ENDPOINT: &str = "api/v1/actuator_types";
pub(crate) const ACTUATION_COMMANDS_ENDPOINT: &str = "api/v1/actuation_commands";
pub(crate) const DETECTIONS_ENDPOINT: &str = "api/v1/detections";
pub(crate) const DETECTIONS_EXPORT_ENDPOINT: &str = "api/v1/detections/export";
pub(crate) const ACTUATIONS_ENDPOINT: &str = "api/v1/actuations";
pub(crate) const ACTUATIONS_EXPORT_ENDPOINT: &str = "api/v1/actuations/export";

/// Number of events the server returns per page.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

pub(crate) const DEFAULT_REST_TIMEOUT: u64 = 30;

pub(crate) const EXPORT_FILE_NAME: &str = "data.csv";
