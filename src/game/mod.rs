pub mod actions;
pub mod auth;
pub mod client;
pub mod combo_hints;
pub mod promo_exchange;
pub mod runner;
