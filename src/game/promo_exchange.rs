use rand::Rng;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use crate::error::{AppError, AppResult};
use crate::utils::http::build_client;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoginClientResponse {
    #[serde(default)]
    client_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RegisterEventResponse {
    #[serde(default)]
    has_code: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateCodeResponse {
    #[serde(default)]
    promo_code: Option<String>,
}

/// Fake device id in the shape the exchange expects:
/// `<unix_ms>-34<digit>0000000000000000`.
fn generate_client_id() -> String {
    let digit = rand::thread_rng().gen_range(1..=9);
    format!(
        "{}-34{}0000000000000000",
        chrono::Utc::now().timestamp_millis(),
        digit
    )
}

/// Client for the third-party reward-code exchange: login-client, then
/// register-event until a code is generated, then create-code. Sessions are
/// bearer-token scoped per campaign.
pub struct PromoExchange {
    http: Client,
    base_url: String,
}

impl PromoExchange {
    pub fn new(base_url: impl Into<String>, proxy: Option<&str>) -> AppResult<Self> {
        Ok(Self {
            http: build_client(proxy, None, 30)?,
            base_url: base_url.into(),
        })
    }

    #[cfg(test)]
    pub fn with_client(http: Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    async fn post<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        bearer: Option<&str>,
        body: serde_json::Value,
    ) -> AppResult<T> {
        let mut request = self
            .http
            .post(format!("{}{}", self.base_url, path))
            .json(&body);
        if let Some(token) = bearer {
            request = request.bearer_auth(token);
        }
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(AppError::UnexpectedResponse(format!(
                "{} returned {}: {}",
                path,
                status,
                text.chars().take(256).collect::<String>()
            )));
        }
        Ok(response.json::<T>().await?)
    }

    /// Authenticates a fresh fake client for one campaign; returns the
    /// session bearer token.
    pub async fn login_client(&self, app_token: &str) -> AppResult<String> {
        let body = json!({
            "appToken": app_token,
            "clientId": generate_client_id(),
            "clientOrigin": "deviceid",
        });
        let parsed: LoginClientResponse = self.post("/promo/login-client", None, body).await?;
        parsed
            .client_token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                AppError::AuthenticationFailed("promo exchange returned no clientToken".into())
            })
    }

    /// Registers interest in a code; the exchange flips `hasCode` once the
    /// fake play session has "earned" one.
    pub async fn register_event(&self, client_token: &str, promo_id: &str) -> AppResult<bool> {
        let body = json!({
            "promoId": promo_id,
            "eventId": uuid::Uuid::new_v4().to_string(),
            "eventOrigin": "undefined",
        });
        let parsed: RegisterEventResponse = self
            .post("/promo/register-event", Some(client_token), body)
            .await?;
        Ok(parsed.has_code)
    }

    pub async fn create_code(&self, client_token: &str, promo_id: &str) -> AppResult<Option<String>> {
        let body = json!({ "promoId": promo_id });
        let parsed: CreateCodeResponse = self
            .post("/promo/create-code", Some(client_token), body)
            .await?;
        Ok(parsed.promo_code.filter(|c| !c.is_empty()))
    }
}
