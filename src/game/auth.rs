use rand::RngCore;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use sha2::{Digest, Sha256};

use crate::error::{AppError, AppResult};
use crate::models::Account;
use crate::utils::webapp::extract_init_data;

/// Environment variable consulted when an account record carries no launch URL.
pub const WEBAPP_URL_ENV: &str = "TGTAPPER_WEBAPP_URL";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoginResponse {
    #[serde(default)]
    auth_token: Option<String>,
}

/// The messaging-platform handshake is an external collaborator: something
/// that turns a stored session into a short-lived web-app launch URL. The
/// runner only depends on this capability.
pub trait WebAppUrlProvider: Send + Sync {
    fn web_app_url(&self, account: &Account) -> AppResult<String>;
}

/// Resolves the launch URL from the account record, falling back to the
/// `TGTAPPER_WEBAPP_URL` environment variable. Operators refresh the URL
/// out of band (the MTProto client that produces it is out of scope here).
pub struct StaticUrlProvider;

impl WebAppUrlProvider for StaticUrlProvider {
    fn web_app_url(&self, account: &Account) -> AppResult<String> {
        if let Some(url) = &account.web_app_url {
            if !url.trim().is_empty() {
                return Ok(url.clone());
            }
        }
        if let Ok(url) = std::env::var(WEBAPP_URL_ENV) {
            if !url.trim().is_empty() {
                return Ok(url);
            }
        }
        Err(AppError::AuthenticationFailed(format!(
            "no web-app launch URL for {}; set web_app_url in the sessions file or {}",
            account.handle(),
            WEBAPP_URL_ENV
        )))
    }
}

/// Random 32-hex fingerprint; the backend only checks the shape.
fn generate_visitor_id() -> String {
    let mut seed = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut seed);
    let digest = Sha256::digest(seed);
    hex::encode(digest)[..32].to_string()
}

/// Exchanges a web-app launch URL for a bearer token via
/// `POST /auth/auth-by-telegram-webapp`.
pub async fn login(client: &Client, base_url: &str, web_app_url: &str) -> AppResult<String> {
    let init_data = extract_init_data(web_app_url)?;
    let body = json!({
        "fingerprint": { "visitorId": generate_visitor_id() },
        "initDataRaw": init_data,
    });

    let response = client
        .post(format!("{}/auth/auth-by-telegram-webapp", base_url))
        .json(&body)
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let text = response.text().await.unwrap_or_default();
        return Err(AppError::AuthenticationFailed(format!(
            "login returned {}: {}",
            status,
            text.chars().take(256).collect::<String>()
        )));
    }

    let parsed: LoginResponse = response.json().await?;
    parsed
        .auth_token
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::AuthenticationFailed("login response had no authToken".into()))
}
