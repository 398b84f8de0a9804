/// Game backend base URL. Endpoints observed empirically; the upstream
/// contract carries no compatibility guarantee.
pub const GAME_API_BASE: &str = "https://api.hamsterkombatgame.io";

/// Third-party combo hint service (guesses the day's winning card set).
pub const COMBO_HINT_URL: &str = "https://api21.datavibe.top/api/GetCombo";

/// Promo-code exchange collaborator.
pub const PROMO_API_BASE: &str = "https://api.gamepromo.io";

/// Browser-looking user agent for every outbound request.
pub const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Cooldown ceiling for a single purchase wait (seconds).
pub const COOLDOWN_CEILING_SECS: u64 = 120;

/// Abort the daily combo when the still-unbought hinted cards cost this much.
pub const COMBO_COST_CEILING: f64 = 5_000_000.0;

/// Default bounded concurrency for the all-accounts fan-out.
pub const DEFAULT_CONCURRENCY: usize = 2;

/// Campaign the promo exchange is slowest for; it gets a larger attempt budget.
pub const SLOW_PROMO_TITLE: &str = "My Clone Army";

/// Closed mapping from game promo id to the promo exchange's application
/// token. Campaigns without an entry are skipped.
pub fn promo_app_token(promo_id: &str) -> Option<&'static str> {
    match promo_id {
        "61308365-9d16-4040-8bb0-2f4a4c69074c" => Some("61308365-9d16-4040-8bb0-2f4a4c69074c"),
        "fe693b26-b342-4159-8808-15e3ff7f8767" => Some("74ee0b5b-775e-4bee-974f-63e7f4d5bacb"),
        "b4170868-cef0-424f-8eb9-be0622e8e8e3" => Some("d1690a07-3780-4068-810f-9b5bbf2931b2"),
        "c4480ac7-e178-4973-8061-9ed5b2e17954" => Some("82647f43-3f87-402d-88dd-09a90025313f"),
        "43e35910-c168-4634-ad4f-52fd764a843f" => Some("d28721be-fd2d-4b45-869e-9f253b554e50"),
        "dc128d28-c45b-411c-98ff-ac7726fbaea4" => Some("8d1cc2ad-e097-4b86-90ef-7a27e19fb833"),
        _ => None,
    }
}
