pub mod executor;

pub mod http_client;

pub mod model;

pub use executor::{AuthenticatedRequestExecutor, RequestOutcome};
pub use http_client::WadasHttpClient;
pub use model::{Payload, RawResponse};
