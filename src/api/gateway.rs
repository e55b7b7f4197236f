use async_trait::async_trait;
use serde_json::Value;

use super::error::ApiError;

/// HTTP verbs against the versioned REST base path.
///
/// Paths are relative to the base path and start with `/`, e.g.
/// `/complications/grossesse/g1`. Each call resolves exactly once.
#[async_trait]
pub trait ApiGateway: Send + Sync {
    async fn get(&self, path: &str) -> Result<Value, ApiError>;

    async fn post(&self, path: &str, body: Value) -> Result<Value, ApiError>;

    async fn put(&self, path: &str, body: Value) -> Result<Value, ApiError>;

    async fn patch(&self, path: &str, body: Option<Value>) -> Result<Value, ApiError>;

    /// Succeeds on any 2xx; the body, if any, is ignored.
    async fn delete(&self, path: &str) -> Result<(), ApiError>;
}
