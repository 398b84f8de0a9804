pub mod account;
pub mod game;
pub mod promo;

pub use account::Account;
