use crate::error::RefreshError;

/// Exchanges the stored refresh token for a new access token.
///
/// Implementations write the new access token to the token store before
/// returning it, leave the store untouched on failure, and never retry on
/// their own: retry policy belongs to the caller.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait TokenRefresher: Send + Sync {
    async fn refresh(&self) -> Result<String, RefreshError>;
}
