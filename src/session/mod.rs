pub mod auth;

pub mod interface;

pub mod refresher;

pub mod single_flight;

pub use auth::Authenticator;
pub use interface::TokenRefresher;
pub use refresher::HttpTokenRefresher;
pub use single_flight::SingleFlightRefresher;
