use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Player state as returned by `clicker/sync`. The backend contract is
/// reverse-engineered, so every field the automation does not strictly need
/// is defaulted instead of rejected.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileSnapshot {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub balance_coins: f64,
    #[serde(default)]
    pub earn_per_tap: i64,
    #[serde(default)]
    pub available_taps: i64,
    #[serde(default)]
    pub earn_passive_per_hour: f64,
    #[serde(default)]
    pub last_passive_earn: f64,
    #[serde(default)]
    pub total_keys: i64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncResponse {
    pub clicker_user: ProfileSnapshot,
}

/// Gate on a card that is not yet purchasable. The backend uses an
/// internally tagged `_type` discriminator; variants this tool cannot act on
/// collapse into `Other`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "_type")]
pub enum PurchaseCondition {
    #[serde(rename_all = "camelCase")]
    ByUpgrade { upgrade_id: String, level: i64 },
    #[serde(rename_all = "camelCase")]
    ReferralCount { referral_count: i64 },
    #[serde(rename_all = "camelCase")]
    MoreReferralsCount { more_referrals_count: i64 },
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpgradeCard {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub level: i64,
    #[serde(default)]
    pub profit_per_hour_delta: f64,
    #[serde(default)]
    pub is_available: bool,
    #[serde(default)]
    pub is_expired: bool,
    #[serde(default)]
    pub cooldown_seconds: Option<u64>,
    #[serde(default)]
    pub condition: Option<PurchaseCondition>,
}

impl UpgradeCard {
    pub fn active_cooldown(&self) -> Option<u64> {
        self.cooldown_seconds.filter(|secs| *secs > 0)
    }

    /// Profit-per-hour gained per coin spent, as a percentage.
    pub fn profit_ratio(&self) -> f64 {
        if self.price <= 0.0 {
            return 0.0;
        }
        self.profit_per_hour_delta / self.price * 100.0
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyComboState {
    #[serde(default)]
    pub upgrade_ids: Vec<String>,
    #[serde(default)]
    pub is_claimed: bool,
    #[serde(default)]
    pub bonus_coins: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpgradesResponse {
    #[serde(default)]
    pub upgrades_for_buy: Vec<UpgradeCard>,
    #[serde(default)]
    pub daily_combo: Option<DailyComboState>,
}

/// `clicker/buy-upgrade` echoes the full owned-upgrade map; only the level
/// of the bought card is read back.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuyUpgradeResponse {
    pub clicker_user: OwnedUpgrades,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OwnedUpgrades {
    #[serde(default)]
    pub upgrades: HashMap<String, OwnedUpgrade>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OwnedUpgrade {
    #[serde(default)]
    pub level: i64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyCipherState {
    #[serde(default)]
    pub cipher: String,
    #[serde(default)]
    pub is_claimed: bool,
    #[serde(default)]
    pub bonus_coins: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MiniGameState {
    #[serde(default)]
    pub is_claimed: bool,
    #[serde(default)]
    pub remain_seconds_to_next_attempt: i64,
    #[serde(default)]
    pub start_date: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigResponse {
    #[serde(default)]
    pub daily_cipher: Option<DailyCipherState>,
    #[serde(default)]
    pub daily_keys_mini_game: Option<MiniGameState>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    #[serde(default)]
    pub reward_coins: f64,
    #[serde(default)]
    pub is_completed: bool,
    #[serde(default)]
    pub days: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TasksResponse {
    #[serde(default)]
    pub tasks: Vec<Task>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckTaskResponse {
    pub task: Task,
    pub clicker_user: ProfileSnapshot,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TapResponse {
    pub clicker_user: ProfileSnapshot,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Boost {
    pub id: String,
    #[serde(default)]
    pub level: i64,
    #[serde(default)]
    pub cooldown_seconds: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoostsResponse {
    #[serde(default)]
    pub boosts_for_buy: Vec<Boost>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimMiniGameResponse {
    pub clicker_user: ProfileSnapshot,
    #[serde(default)]
    pub daily_keys_mini_game: Option<MiniGameState>,
}

/// `GET /ip` payload; purely informational, every field optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IpInfo {
    #[serde(default)]
    pub ip: Option<String>,
    #[serde(default)]
    pub country_code: Option<String>,
    #[serde(default)]
    pub city_name: Option<String>,
    #[serde(default)]
    pub asn_org: Option<String>,
}
