//! 认证：OAuth2 password grant

use serde::Deserialize;
use tracing::info;

use crate::config::Config;
use crate::error::AuthError;

#[derive(Deserialize)]
struct TokenResponse {
    #[serde(default)]
    access_token: Option<String>,
}

/// 登录 API 获取 bearer token
pub async fn get_token(config: &Config) -> Result<String, AuthError> {
    let endpoint = format!("{}/token", config.api_base_url.trim_end_matches('/'));
    info!("🔑 正在获取 token: {}", endpoint);

    let client = reqwest::Client::builder()
        .timeout(config.timeout())
        .build()
        .map_err(|e| AuthError::RequestFailed {
            endpoint: endpoint.clone(),
            source: e,
        })?;

    let form = [
        ("grant_type", "password"),
        ("username", config.username.as_str()),
        ("password", config.password.as_str()),
    ];

    let resp = client
        .post(&endpoint)
        .form(&form)
        .send()
        .await
        .map_err(|e| AuthError::RequestFailed {
            endpoint: endpoint.clone(),
            source: e,
        })?;

    let status = resp.status();
    if !status.is_success() {
        return Err(AuthError::Rejected {
            endpoint,
            status: status.as_u16(),
        });
    }

    let body: TokenResponse = resp.json().await.map_err(|e| AuthError::RequestFailed {
        endpoint: endpoint.clone(),
        source: e,
    })?;

    match body.access_token {
        Some(token) if !token.is_empty() => Ok(token),
        _ => Err(AuthError::MissingToken { endpoint }),
    }
}
