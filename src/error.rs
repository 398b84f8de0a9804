use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("card {0} not found in upgrades-for-buy")]
    CardNotFound(String),

    #[error("card {0} is not available for purchase")]
    CardUnavailable(String),

    #[error("not enough balance to buy {card}: price {price}, balance {balance}")]
    InsufficientBalance {
        card: String,
        price: f64,
        balance: f64,
    },

    #[error("{needed} referrals required to buy {card}")]
    ReferralRequirementUnmet { card: String, needed: i64 },

    #[error("card {card} cooldown {cooldown_secs}s exceeds the {ceiling_secs}s ceiling")]
    CooldownTooLong {
        card: String,
        cooldown_secs: u64,
        ceiling_secs: u64,
    },

    #[error("prerequisite cycle detected at card {0}")]
    PrerequisiteCycle(String),

    #[error("no combo hint available for today")]
    ComboHintUnavailable,

    #[error("combo purchase cost {cost} exceeds the {ceiling} safety ceiling")]
    ComboCostTooHigh { cost: f64, ceiling: f64 },

    #[error("no promo code obtained for {0} within the attempt budget")]
    PromoCodeUnobtainable(String),

    #[error("run cancelled")]
    Cancelled,

    #[error("session error: {0}")]
    Session(String),

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),
}

pub type AppResult<T> = Result<T, AppError>;
