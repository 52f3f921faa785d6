pub mod clock;
pub mod config;
pub mod logging;
pub mod security;
pub mod token;
