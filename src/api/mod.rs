pub mod client;
pub mod error;

pub use client::*;
pub use error::*;

use async_trait::async_trait;
use reqwest::Url;

use crate::types::{Credential, Position, ServerMessage, Strategy, Symbol};

/// How the server answered a login post.
#[derive(Debug, Clone, PartialEq)]
pub enum LoginReply {
    /// The request was redirected; carries the final URL. The body is not read.
    Redirected(Url),
    /// 2xx without redirect.
    Body(ServerMessage),
}

/// The account web API. Every call is a single attempt.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountApi: Send + Sync {
    async fn login(&self, credential: &Credential) -> ApiResult<LoginReply>;
    async fn positions(&self, symbol: &Symbol) -> ApiResult<Vec<Position>>;
    async fn strategies(&self) -> ApiResult<Vec<Strategy>>;
    async fn start_strategy(&self, name: &str) -> ApiResult<()>;
    async fn stop_strategy(&self) -> ApiResult<()>;
    async fn close_positions(&self, symbol: &Symbol) -> ApiResult<ServerMessage>;
}
