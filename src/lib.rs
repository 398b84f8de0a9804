pub mod cli;
pub mod constants;
pub mod error;
pub mod game;
pub mod models;
pub mod modules;
pub mod utils;

#[cfg(test)]
mod test_utils;

pub use cli::run;
pub use error::{AppError, AppResult};
