//! Google OAuth2 client: authorize URL, code-for-token exchange and userinfo.

use std::time::Duration;

use reqwest::{Client, header::ACCEPT};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use url::Url;
use utoipa::ToSchema;

use crate::config::GoogleOAuthConfig;
use crate::error::AppError;

pub const NOT_CONFIGURED: &str = "Google OAuth is not configured";
pub const TOKEN_ENDPOINT_FAILURE: &str = "Failed to call Google token endpoint";
pub const USERINFO_FAILURE: &str = "Failed to call Google userinfo endpoint";
pub const LOGIN_SCOPES: &str = "openid profile email";

const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Token endpoint payload, relayed to clients unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AuthTokenResponse {
    pub access_token: Option<String>,
    /// Lifetime in seconds; accepted as a JSON string or number
    #[serde(default, deserialize_with = "string_or_number")]
    pub expires_in: Option<String>,
    pub refresh_token: Option<String>,
    pub scope: Option<String>,
    pub token_type: Option<String>,
    pub id_token: Option<String>,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(serde::de::Error::custom(format!(
            "expected string or number for expires_in, got {other}"
        ))),
    }
}

/// Exchanges authorization codes with Google's token endpoint.
///
/// Credentials are checked per call, so the service can be constructed (and
/// the server started) without them.
#[derive(Debug, Clone)]
pub struct OAuthExchangeService {
    config: GoogleOAuthConfig,
    http_client: Client,
}

impl OAuthExchangeService {
    pub fn new(config: GoogleOAuthConfig) -> Result<Self, reqwest::Error> {
        let http_client = Client::builder().timeout(HTTP_TIMEOUT).build()?;
        Ok(Self {
            config,
            http_client,
        })
    }

    pub fn config(&self) -> &GoogleOAuthConfig {
        &self.config
    }

    /// Provider consent URL for the login redirect.
    pub fn build_authorize_url(&self, state: &str) -> Result<Url, AppError> {
        let client_id = self
            .config
            .client_id
            .as_deref()
            .ok_or_else(|| AppError::Misconfigured(NOT_CONFIGURED.to_string()))?;

        let mut url = Url::parse(&self.config.authorize_url).map_err(|err| {
            tracing::error!(error = %err, "Invalid Google authorize URL");
            AppError::Misconfigured(NOT_CONFIGURED.to_string())
        })?;

        url.query_pairs_mut()
            .append_pair("client_id", client_id)
            .append_pair("redirect_uri", &self.config.redirect_uri)
            .append_pair("response_type", "code")
            .append_pair("scope", LOGIN_SCOPES)
            .append_pair("state", state);

        Ok(url)
    }

    /// Trades an authorization code for tokens. No retries.
    pub async fn exchange_code_for_tokens(&self, code: &str) -> Result<AuthTokenResponse, AppError> {
        let Some((client_id, client_secret)) = self.config.credentials() else {
            return Err(AppError::Misconfigured(NOT_CONFIGURED.to_string()));
        };

        let params = [
            ("code", code),
            ("client_id", client_id),
            ("client_secret", client_secret),
            ("redirect_uri", self.config.redirect_uri.as_str()),
            ("grant_type", "authorization_code"),
        ];

        let response = self
            .http_client
            .post(&self.config.token_url)
            .header(ACCEPT, "application/json")
            .form(&params)
            .send()
            .await
            .map_err(|err| {
                tracing::warn!(error = %err, "Token request failed");
                AppError::UpstreamUnavailable(TOKEN_ENDPOINT_FAILURE.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.map_err(|err| {
                tracing::warn!(error = %err, %status, "Could not read token error body");
                AppError::UpstreamUnavailable(TOKEN_ENDPOINT_FAILURE.to_string())
            })?;
            tracing::info!(%status, "Token endpoint rejected authorization code");
            return Err(AppError::UpstreamBadRequest(body));
        }

        response.json::<AuthTokenResponse>().await.map_err(|err| {
            tracing::warn!(error = %err, "Failed to parse token response");
            AppError::UpstreamUnavailable(TOKEN_ENDPOINT_FAILURE.to_string())
        })
    }

    /// Fetches the userinfo document for an access token.
    pub async fn fetch_user_info(&self, access_token: &str) -> Result<Map<String, Value>, AppError> {
        let response = self
            .http_client
            .get(&self.config.userinfo_url)
            .bearer_auth(access_token)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|err| {
                tracing::warn!(error = %err, "Userinfo request failed");
                AppError::UpstreamUnavailable(USERINFO_FAILURE.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::info!(%status, "Userinfo endpoint rejected access token");
            return Err(AppError::UpstreamBadRequest(body));
        }

        response.json::<Map<String, Value>>().await.map_err(|err| {
            tracing::warn!(error = %err, "Failed to parse userinfo response");
            AppError::UpstreamUnavailable(USERINFO_FAILURE.to_string())
        })
    }
}
