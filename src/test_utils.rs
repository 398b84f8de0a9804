//! Scriptable in-process game backend for handler tests, plus the shared
//! process-env guard for tests that touch environment variables.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock};

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

fn global_env_lock() -> &'static Mutex<()> {
    static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    LOCK.get_or_init(|| Mutex::new(()))
}

/// Serializes tests that read or mutate process environment variables.
pub fn lock_env() -> MutexGuard<'static, ()> {
    global_env_lock()
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Sets or unsets one env var for the guard's lifetime, restoring the
/// previous value on drop. Hold [`lock_env`] while one of these is alive.
pub struct ScopedEnvVar {
    key: &'static str,
    original: Option<String>,
}

impl ScopedEnvVar {
    pub fn set(key: &'static str, value: &str) -> Self {
        let original = std::env::var(key).ok();
        std::env::set_var(key, value);
        Self { key, original }
    }

    pub fn unset(key: &'static str) -> Self {
        let original = std::env::var(key).ok();
        std::env::remove_var(key);
        Self { key, original }
    }
}

impl Drop for ScopedEnvVar {
    fn drop(&mut self) {
        if let Some(value) = self.original.as_deref() {
            std::env::set_var(self.key, value);
        } else {
            std::env::remove_var(self.key);
        }
    }
}

#[derive(Debug, Clone)]
pub struct MockCard {
    pub id: String,
    pub name: String,
    pub price: f64,
    pub level: i64,
    pub profit_delta: f64,
    pub available: bool,
    pub expired: bool,
    pub cooldown: Option<u64>,
    pub condition: Option<Value>,
}

impl MockCard {
    pub fn available(id: &str, price: f64, profit_delta: f64) -> Self {
        Self {
            id: id.into(),
            name: id.replace('_', " "),
            price,
            level: 0,
            profit_delta,
            available: true,
            expired: false,
            cooldown: None,
            condition: None,
        }
    }

    pub fn locked_behind(id: &str, price: f64, prereq: &str, required_level: i64) -> Self {
        let mut card = Self::available(id, price, 0.0);
        card.available = false;
        card.condition = Some(json!({
            "_type": "ByUpgrade",
            "upgradeId": prereq,
            "level": required_level,
        }));
        card
    }

    fn to_json(&self) -> Value {
        let mut card = json!({
            "id": self.id,
            "name": self.name,
            "price": self.price,
            "level": self.level,
            "profitPerHourDelta": self.profit_delta,
            "isAvailable": self.available,
            "isExpired": self.expired,
        });
        if let Some(secs) = self.cooldown {
            card["cooldownSeconds"] = json!(secs);
        }
        if let Some(condition) = &self.condition {
            card["condition"] = condition.clone();
        }
        card
    }
}

#[derive(Debug, Default)]
pub struct MockBackend {
    pub balance: f64,
    pub earn_per_tap: i64,
    pub available_taps: i64,
    pub total_keys: i64,
    pub user_id: String,
    pub cards: Vec<MockCard>,
    pub combo_bought_ids: Vec<String>,
    pub combo_claimed: bool,
    pub daily_cipher: Option<Value>,
    pub mini_game: Option<Value>,
    pub tasks: Vec<Value>,
    pub promos: Value,

    pub buy_calls: Vec<String>,
    pub combo_claims: usize,
    pub cipher_claims: Vec<String>,
    pub tap_calls: Vec<(i64, i64)>,
    pub checked_tasks: Vec<String>,
    pub mini_game_starts: usize,
    pub mini_game_claims: Vec<String>,
    pub applied_promo_codes: Vec<String>,
    pub logins: Vec<String>,
    pub boosts: Vec<Value>,
    pub boost_refill_to: i64,
    pub applied_boosts: Vec<String>,
}

impl MockBackend {
    pub fn with_cards(balance: f64, cards: Vec<MockCard>) -> Self {
        Self {
            balance,
            user_id: "7000001".into(),
            cards,
            promos: json!({ "promos": [], "states": [] }),
            ..Default::default()
        }
    }

    fn profile_json(&self) -> Value {
        json!({ "clickerUser": {
            "id": self.user_id,
            "balanceCoins": self.balance,
            "earnPerTap": self.earn_per_tap,
            "availableTaps": self.available_taps,
            "earnPassivePerHour": 0.0,
            "lastPassiveEarn": 0.0,
            "totalKeys": self.total_keys,
        }})
    }

    /// Applies a purchase: bump the level, charge the balance, and unlock any
    /// card whose ByUpgrade gate the new levels now satisfy.
    fn apply_buy(&mut self, id: &str) -> Option<i64> {
        let card = self.cards.iter_mut().find(|c| c.id == id)?;
        card.level += 1;
        let price = card.price;
        let new_level = card.level;
        self.balance -= price;

        let levels: HashMap<String, i64> =
            self.cards.iter().map(|c| (c.id.clone(), c.level)).collect();
        for card in &mut self.cards {
            if card.available {
                continue;
            }
            let Some(condition) = &card.condition else {
                continue;
            };
            if condition["_type"] == "ByUpgrade" {
                let target = condition["upgradeId"].as_str().unwrap_or_default();
                let required = condition["level"].as_i64().unwrap_or(i64::MAX);
                if levels.get(target).copied().unwrap_or(0) >= required {
                    card.available = true;
                }
            }
        }
        Some(new_level)
    }
}

type Shared = Arc<Mutex<MockBackend>>;

async fn upgrades_for_buy(State(state): State<Shared>) -> Json<Value> {
    let state = state.lock().unwrap();
    let cards: Vec<Value> = state.cards.iter().map(MockCard::to_json).collect();
    Json(json!({
        "upgradesForBuy": cards,
        "dailyCombo": {
            "upgradeIds": state.combo_bought_ids.clone(),
            "isClaimed": state.combo_claimed,
            "bonusCoins": 5_000_000.0,
        },
    }))
}

async fn sync(State(state): State<Shared>) -> Json<Value> {
    Json(state.lock().unwrap().profile_json())
}

async fn buy_upgrade(State(state): State<Shared>, Json(body): Json<Value>) -> Json<Value> {
    let id = body["upgradeId"].as_str().unwrap_or_default().to_string();
    let mut state = state.lock().unwrap();
    state.buy_calls.push(id.clone());
    let level = state.apply_buy(&id).unwrap_or(0);
    let mut response = json!({ "clickerUser": { "upgrades": {} } });
    response["clickerUser"]["upgrades"][&id] = json!({ "level": level });
    Json(response)
}

async fn claim_daily_combo(State(state): State<Shared>) -> Json<Value> {
    let mut state = state.lock().unwrap();
    state.combo_claims += 1;
    state.combo_claimed = true;
    let profile = state.profile_json();
    Json(profile)
}

async fn config(State(state): State<Shared>) -> Json<Value> {
    let state = state.lock().unwrap();
    let mut payload = json!({});
    if let Some(cipher) = &state.daily_cipher {
        payload["dailyCipher"] = cipher.clone();
    }
    if let Some(mini_game) = &state.mini_game {
        payload["dailyKeysMiniGame"] = mini_game.clone();
    }
    Json(payload)
}

async fn claim_daily_cipher(State(state): State<Shared>, Json(body): Json<Value>) -> Json<Value> {
    let cipher = body["cipher"].as_str().unwrap_or_default().to_string();
    let mut state = state.lock().unwrap();
    state.cipher_claims.push(cipher);
    let profile = state.profile_json();
    Json(profile)
}

async fn tap(State(state): State<Shared>, Json(body): Json<Value>) -> Json<Value> {
    let remaining = body["availableTaps"].as_i64().unwrap_or(-1);
    let count = body["count"].as_i64().unwrap_or(-1);
    let mut state = state.lock().unwrap();
    state.tap_calls.push((remaining, count));
    let profile = state.profile_json();
    Json(profile)
}

async fn list_tasks(State(state): State<Shared>) -> Json<Value> {
    let state = state.lock().unwrap();
    Json(json!({ "tasks": state.tasks }))
}

async fn check_task(State(state): State<Shared>, Json(body): Json<Value>) -> Json<Value> {
    let id = body["taskId"].as_str().unwrap_or_default().to_string();
    let mut state = state.lock().unwrap();
    state.checked_tasks.push(id.clone());
    let days = state
        .tasks
        .iter()
        .find(|t| t["id"] == id.as_str())
        .and_then(|t| t["days"].as_i64());
    let mut task = json!({ "id": id, "isCompleted": true, "rewardCoins": 100.0 });
    if let Some(days) = days {
        task["days"] = json!(days);
    }
    let mut response = state.profile_json();
    response["task"] = task;
    Json(response)
}

async fn start_mini_game(State(state): State<Shared>) -> Json<Value> {
    let mut state = state.lock().unwrap();
    state.mini_game_starts += 1;
    Json(json!({ "status": "Ok" }))
}

async fn claim_mini_game(State(state): State<Shared>, Json(body): Json<Value>) -> Json<Value> {
    let cipher = body["cipher"].as_str().unwrap_or_default().to_string();
    let mut state = state.lock().unwrap();
    state.mini_game_claims.push(cipher);
    state.total_keys += 1;
    let mut response = state.profile_json();
    response["dailyKeysMiniGame"] = json!({ "isClaimed": true, "remainSecondsToNextAttempt": 0 });
    Json(response)
}

async fn get_promos(State(state): State<Shared>) -> Json<Value> {
    let state = state.lock().unwrap();
    Json(state.promos.clone())
}

async fn apply_promo(State(state): State<Shared>, Json(body): Json<Value>) -> Json<Value> {
    let code = body["promoCode"].as_str().unwrap_or_default().to_string();
    let mut state = state.lock().unwrap();
    state.applied_promo_codes.push(code);
    state.total_keys += 1;
    let claimed = state.applied_promo_codes.len() as i64;
    let mut response = state.profile_json();
    response["promoState"] = json!({ "promoId": "p-1", "receiveKeysToday": claimed });
    Json(response)
}

async fn boosts_for_buy(State(state): State<Shared>) -> Json<Value> {
    let state = state.lock().unwrap();
    Json(json!({ "boostsForBuy": state.boosts }))
}

async fn apply_boost(State(state): State<Shared>, Json(body): Json<Value>) -> Json<Value> {
    let id = body["boostId"].as_str().unwrap_or_default().to_string();
    let mut state = state.lock().unwrap();
    state.applied_boosts.push(id);
    state.available_taps = state.boost_refill_to;
    let profile = state.profile_json();
    Json(profile)
}

async fn ip() -> Json<Value> {
    Json(json!({ "ip": "127.0.0.1", "country_code": "XX" }))
}

async fn auth(State(state): State<Shared>, Json(body): Json<Value>) -> Json<Value> {
    let init_data = body["initDataRaw"].as_str().unwrap_or_default().to_string();
    state.lock().unwrap().logins.push(init_data);
    Json(json!({ "authToken": "mock-token", "status": "Ok" }))
}

/// Serves the mock backend on an ephemeral port; returns its base URL.
pub async fn spawn_mock_game(state: Shared) -> (String, JoinHandle<()>) {
    let app = Router::new()
        .route("/clicker/upgrades-for-buy", post(upgrades_for_buy))
        .route("/clicker/sync", post(sync))
        .route("/clicker/buy-upgrade", post(buy_upgrade))
        .route("/clicker/claim-daily-combo", post(claim_daily_combo))
        .route("/clicker/config", post(config))
        .route("/clicker/claim-daily-cipher", post(claim_daily_cipher))
        .route("/clicker/tap", post(tap))
        .route("/clicker/list-tasks", post(list_tasks))
        .route("/clicker/check-task", post(check_task))
        .route("/clicker/start-keys-minigame", post(start_mini_game))
        .route("/clicker/claim-daily-keys-minigame", post(claim_mini_game))
        .route("/clicker/boosts-for-buy", post(boosts_for_buy))
        .route("/clicker/apply-boost", post(apply_boost))
        .route("/clicker/get-promos", post(get_promos))
        .route("/clicker/apply-promo", post(apply_promo))
        .route("/ip", get(ip))
        .route("/auth/auth-by-telegram-webapp", post(auth))
        .with_state(state);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{}", addr), handle)
}
