// src/meter/mod.rs

pub mod config;
pub mod session;

pub use config::SessionConfig;
pub use session::Session;
