pub mod analysis;
pub mod cli;
pub mod client;
pub mod config;
pub mod directory;
pub mod gateway;
pub mod logging;
pub mod ocr;
pub mod types;
pub mod web;

pub use config::AppConfig;
pub use web::{build_rocket, start_web_server};
