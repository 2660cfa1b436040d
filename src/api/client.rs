use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode, Url};
use serde_json::Value;
use tracing::{debug, info};

use super::{AccountApi, ApiError, ApiResult, LoginReply};
use crate::types::{
    positions_from_body, strategies_from_body, ClosePositionsRequest, Credential, Position,
    ServerMessage, StartStrategyRequest, Strategy, Symbol,
};

/// `reqwest` client for the account server. Keeps a cookie store so the
/// session set by `/login` is sent with later account calls.
#[derive(Debug, Clone)]
pub struct HttpAccountApi {
    client: Client,
    base_url: String,
}

impl HttpAccountApi {
    pub fn new(base_url: &str) -> ApiResult<Self> {
        let parsed = Url::parse(base_url).map_err(|_| ApiError::InvalidUrl(base_url.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ApiError::InvalidUrl(base_url.to_string()));
        }

        let client = Client::builder().cookie_store(true).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, path: &str) -> ApiResult<Url> {
        let url = format!("{}{}", self.base_url, path);
        Url::parse(&url).map_err(|_| ApiError::InvalidUrl(url))
    }

    /// Passes 2xx replies through; anything else becomes `ApiError::Status`
    /// with whatever message the server put in its body.
    async fn ensure_success(response: Response) -> ApiResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<Value>(&text)
            .ok()
            .and_then(|body| ServerMessage::from_body(&body).detail().map(str::to_string));
        if let Some(message) = &message {
            debug!("Server replied {} with: {}", status, message);
        }
        Err(ApiError::status(status, message))
    }
}

#[async_trait]
impl AccountApi for HttpAccountApi {
    async fn login(&self, credential: &Credential) -> ApiResult<LoginReply> {
        let url = self.endpoint("/login")?;
        debug!("Posting credentials for {}", credential.username);

        let response = self
            .client
            .post(url.clone())
            .form(&credential.form_fields())
            .send()
            .await?;

        if response.url() != &url {
            info!("Login redirected to {}", response.url());
            return Ok(LoginReply::Redirected(response.url().clone()));
        }

        let response = Self::ensure_success(response).await?;
        let text = response.text().await?;
        let body: Value = serde_json::from_str(&text)?;
        Ok(LoginReply::Body(ServerMessage::from_success(&body)))
    }

    async fn positions(&self, symbol: &Symbol) -> ApiResult<Vec<Position>> {
        let url = self.endpoint(&format!("/account/positions/{}", symbol))?;

        // Status is not checked: error replies fail the shape check below.
        let text = self.client.get(url).send().await?.text().await?;
        let body: Value = serde_json::from_str(&text)?;

        positions_from_body(&body).ok_or_else(|| ApiError::UnexpectedShape(body.to_string()))
    }

    async fn strategies(&self) -> ApiResult<Vec<Strategy>> {
        let url = self.endpoint("/account/strategies")?;
        let response = Self::ensure_success(self.client.get(url).send().await?).await?;

        if response.status() == StatusCode::NO_CONTENT {
            return Ok(Vec::new());
        }
        let text = response.text().await?;
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }
        let body: Value = serde_json::from_str(&text)?;
        strategies_from_body(&body).ok_or_else(|| ApiError::UnexpectedShape(body.to_string()))
    }

    async fn start_strategy(&self, name: &str) -> ApiResult<()> {
        let url = self.endpoint("/account/start_strategy")?;
        let response = self
            .client
            .post(url)
            .json(&StartStrategyRequest { strategy: name })
            .send()
            .await?;

        Self::ensure_success(response).await?;
        Ok(())
    }

    async fn stop_strategy(&self) -> ApiResult<()> {
        let url = self.endpoint("/account/stop_strategy")?;
        Self::ensure_success(self.client.post(url).send().await?).await?;
        Ok(())
    }

    async fn close_positions(&self, symbol: &Symbol) -> ApiResult<ServerMessage> {
        let url = self.endpoint("/account/close_positions")?;
        let response = self
            .client
            .post(url)
            .json(&ClosePositionsRequest { symbol: symbol.as_str() })
            .send()
            .await?;

        let text = Self::ensure_success(response).await?.text().await?;
        let body: Value = serde_json::from_str(&text)?;
        Ok(ServerMessage::from_success(&body))
    }
}
