//! Credential resolution.

use async_trait::async_trait;
use futures::future::BoxFuture;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use crate::Result;

/// Produces a credential for an outgoing request.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// Return the current token, or `None` to send the request unauthenticated.
    async fn token(&self) -> Result<Option<String>>;
}

/// Adapter turning an async closure into a [`TokenProvider`].
pub struct FnTokenProvider<F> {
    f: F,
}

#[async_trait]
impl<F> TokenProvider for FnTokenProvider<F>
where
    F: Fn() -> BoxFuture<'static, Result<Option<String>>> + Send + Sync,
{
    async fn token(&self) -> Result<Option<String>> {
        (self.f)().await
    }
}

/// Where the client gets its credential from.
///
/// A static token wins over a provider. The provider is awaited before
/// every dispatch; nothing is cached between calls.
#[derive(Clone, Default)]
pub enum TokenSource {
    /// No credential.
    #[default]
    Anonymous,
    /// A fixed token.
    Static(String),
    /// A token fetched per request.
    Provider(Arc<dyn TokenProvider>),
}

impl TokenSource {
    /// Fixed token.
    pub fn fixed(token: impl Into<String>) -> Self {
        Self::Static(token.into())
    }

    /// Token fetched through `provider` before every request.
    pub fn provider(provider: impl TokenProvider + 'static) -> Self {
        Self::Provider(Arc::new(provider))
    }

    /// Token fetched through an async closure before every request.
    pub fn from_fn<F, Fut>(f: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Option<String>>> + Send + 'static,
    {
        Self::provider(FnTokenProvider {
            f: move || -> BoxFuture<'static, Result<Option<String>>> { Box::pin(f()) },
        })
    }

    /// Resolve the credential for one request. Empty tokens count as none.
    pub async fn resolve(&self) -> Result<Option<String>> {
        let token = match self {
            Self::Anonymous => None,
            Self::Static(token) => Some(token.clone()),
            Self::Provider(provider) => provider.token().await?,
        };

        Ok(token.filter(|t| !t.trim().is_empty()))
    }
}

impl fmt::Debug for TokenSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Anonymous => f.write_str("Anonymous"),
            Self::Static(_) => f.write_str("Static(<redacted>)"),
            Self::Provider(_) => f.write_str("Provider(..)"),
        }
    }
}
