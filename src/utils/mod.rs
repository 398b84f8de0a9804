pub mod cipher;
pub mod http;
pub mod webapp;
