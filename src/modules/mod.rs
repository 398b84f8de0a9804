pub mod logger;
pub mod session_store;
