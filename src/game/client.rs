use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use crate::error::{AppError, AppResult};
use crate::models::game::{
    BoostsResponse, BuyUpgradeResponse, CheckTaskResponse, ConfigResponse, IpInfo, ProfileSnapshot,
    SyncResponse, TapResponse, TasksResponse, UpgradesResponse,
};
use crate::models::promo::{ApplyPromoResponse, GetPromosResponse};

fn unix_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Stateless typed wrappers over the game backend. One instance per account
/// run; the underlying client already carries the bearer token and the
/// account's proxy.
#[derive(Debug, Clone)]
pub struct GameClient {
    http: Client,
    base_url: String,
    handle: String,
}

impl GameClient {
    pub fn new(http: Client, base_url: impl Into<String>, handle: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            handle: handle.into(),
        }
    }

    /// Account log prefix, e.g. `@johndoe`.
    pub fn handle(&self) -> &str {
        &self.handle
    }

    async fn post_json<T: DeserializeOwned>(&self, path: &str, body: Value) -> AppResult<T> {
        let response = self
            .http
            .post(format!("{}{}", self.base_url, path))
            .json(&body)
            .send()
            .await?;
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

    pub async fn config(&self) -> AppResult<ConfigResponse> {
        self.post_json("/clicker/config", json!({})).await
    }

    pub async fn sync_profile(&self) -> AppResult<ProfileSnapshot> {
        let sync: SyncResponse = self.post_json("/clicker/sync", json!({})).await?;
        Ok(sync.clicker_user)
    }

    pub async fn list_tasks(&self) -> AppResult<TasksResponse> {
        self.post_json("/clicker/list-tasks", json!({})).await
    }

    pub async fn check_task(&self, task_id: &str) -> AppResult<CheckTaskResponse> {
        self.post_json("/clicker/check-task", json!({ "taskId": task_id }))
            .await
    }

    pub async fn upgrades_for_buy(&self) -> AppResult<UpgradesResponse> {
        self.post_json("/clicker/upgrades-for-buy", json!({})).await
    }

    pub async fn buy_upgrade(&self, upgrade_id: &str) -> AppResult<BuyUpgradeResponse> {
        self.post_json(
            "/clicker/buy-upgrade",
            json!({ "timestamp": unix_millis(), "upgradeId": upgrade_id }),
        )
        .await
    }

    pub async fn claim_daily_cipher(&self, cipher: &str) -> AppResult<Value> {
        self.post_json("/clicker/claim-daily-cipher", json!({ "cipher": cipher }))
            .await
    }

    pub async fn claim_daily_combo(&self) -> AppResult<Value> {
        self.post_json("/clicker/claim-daily-combo", json!({})).await
    }

    /// Submits one tap batch: the taps taken plus the energy the client
    /// claims to have left afterwards.
    pub async fn tap(&self, remaining_taps: i64, count: i64) -> AppResult<TapResponse> {
        self.post_json(
            "/clicker/tap",
            json!({
                "availableTaps": remaining_taps,
                "count": count,
                "timestamp": unix_millis(),
            }),
        )
        .await
    }

    pub async fn boosts_for_buy(&self) -> AppResult<BoostsResponse> {
        self.post_json("/clicker/boosts-for-buy", json!({})).await
    }

    pub async fn apply_boost(&self, boost_id: &str) -> AppResult<Value> {
        self.post_json(
            "/clicker/apply-boost",
            json!({ "boostId": boost_id, "timestamp": unix_millis() }),
        )
        .await
    }

    pub async fn get_promos(&self) -> AppResult<GetPromosResponse> {
        self.post_json("/clicker/get-promos", json!({})).await
    }

    pub async fn apply_promo(&self, promo_code: &str) -> AppResult<ApplyPromoResponse> {
        self.post_json("/clicker/apply-promo", json!({ "promoCode": promo_code }))
            .await
    }

    pub async fn start_mini_game(&self) -> AppResult<Value> {
        self.post_json("/clicker/start-keys-minigame", json!({}))
            .await
    }

    pub async fn claim_mini_game(
        &self,
        cipher: &str,
    ) -> AppResult<crate::models::game::ClaimMiniGameResponse> {
        self.post_json("/clicker/claim-daily-keys-minigame", json!({ "cipher": cipher }))
            .await
    }

    pub async fn ip_info(&self) -> AppResult<IpInfo> {
        let response = self
            .http
            .get(format!("{}/ip", self.base_url))
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AppError::UnexpectedResponse(format!(
                "/ip returned {}",
                status
            )));
        }
        Ok(response.json::<IpInfo>().await?)
    }
}
