use serde::Deserialize;

use super::game::ProfileSnapshot;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PromoTitle {
    #[serde(default)]
    pub en: String,
}

/// One promo campaign advertised by the game backend.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromoCampaign {
    pub promo_id: String,
    #[serde(default)]
    pub title: PromoTitle,
    #[serde(default)]
    pub keys_per_day: i64,
}

/// Per-campaign claim progress; `receive_keys_today` is server-authoritative.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromoState {
    pub promo_id: String,
    #[serde(default)]
    pub receive_keys_today: i64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetPromosResponse {
    #[serde(default)]
    pub promos: Vec<PromoCampaign>,
    #[serde(default)]
    pub states: Vec<PromoState>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyPromoResponse {
    pub clicker_user: ProfileSnapshot,
    pub promo_state: PromoState,
}
