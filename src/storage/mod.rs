pub mod file_store;

pub mod session;

pub mod token_store;

pub use file_store::FileTokenStore;
pub use session::Session;
pub use token_store::{MemoryTokenStore, TokenKind, TokenStore};
