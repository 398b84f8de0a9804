use async_trait::async_trait;
use chrono::{Duration, NaiveDate, Utc};
use reqwest::Client;
use serde::Deserialize;

use crate::error::{AppError, AppResult};

/// Source of the day's guessed combo card ids. The hint is external and
/// best-effort, never authoritative; providers can be swapped without
/// touching the combo handler.
#[async_trait]
pub trait ComboHintProvider: Send + Sync {
    async fn fetch(&self) -> AppResult<Vec<String>>;
}

#[derive(Debug, Deserialize)]
struct ComboHintPayload {
    #[serde(default)]
    date: String,
    #[serde(default)]
    combo: Vec<String>,
}

/// Third-party guessing service. Its payload carries a `DD-MM-YY` date; the
/// hint only counts when that date is today or earlier at UTC-6 (the
/// service's reset timezone).
pub struct DatavibeComboProvider {
    http: Client,
    url: String,
}

impl DatavibeComboProvider {
    pub fn new(http: Client, url: impl Into<String>) -> Self {
        Self {
            http,
            url: url.into(),
        }
    }

    fn hint_is_current(date: &str) -> bool {
        let Ok(parsed) = NaiveDate::parse_from_str(date, "%d-%m-%y") else {
            return false;
        };
        let today = (Utc::now() - Duration::hours(6)).date_naive();
        parsed <= today
    }
}

#[async_trait]
impl ComboHintProvider for DatavibeComboProvider {
    async fn fetch(&self) -> AppResult<Vec<String>> {
        let response = self.http.get(&self.url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AppError::UnexpectedResponse(format!(
                "combo hint service returned {}",
                status
            )));
        }
        let payload: ComboHintPayload = response.json().await?;
        if Self::hint_is_current(&payload.date) {
            Ok(payload.combo)
        } else {
            Ok(Vec::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{routing::get, Json, Router};
    use serde_json::json;
    use tokio::net::TcpListener;

    #[test]
    fn stale_or_malformed_dates_are_not_current() {
        assert!(!DatavibeComboProvider::hint_is_current("not-a-date"));
        assert!(!DatavibeComboProvider::hint_is_current(""));
        // %y maps 00-68 to 20xx, so this is 2050.
        assert!(!DatavibeComboProvider::hint_is_current("31-12-50"));
    }

    #[test]
    fn past_dates_are_current() {
        assert!(DatavibeComboProvider::hint_is_current("01-01-20"));
    }

    #[tokio::test]
    async fn provider_returns_combo_for_current_hint() {
        let today = (Utc::now() - Duration::hours(6)).date_naive();
        let date = today.format("%d-%m-%y").to_string();
        let app = Router::new().route(
            "/api/GetCombo",
            get(move || async move {
                Json(json!({ "date": date, "combo": ["a", "b", "c"] }))
            }),
        );
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let provider = DatavibeComboProvider::new(
            Client::new(),
            format!("http://{}/api/GetCombo", addr),
        );
        assert_eq!(provider.fetch().await.unwrap(), vec!["a", "b", "c"]);
        server.abort();
    }

    #[tokio::test]
    async fn provider_returns_empty_for_future_hint() {
        let future = (Utc::now() + Duration::days(3)).date_naive();
        let date = future.format("%d-%m-%y").to_string();
        let app = Router::new().route(
            "/api/GetCombo",
            get(move || async move { Json(json!({ "date": date, "combo": ["a"] })) }),
        );
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let provider = DatavibeComboProvider::new(
            Client::new(),
            format!("http://{}/api/GetCombo", addr),
        );
        assert!(provider.fetch().await.unwrap().is_empty());
        server.abort();
    }
}
