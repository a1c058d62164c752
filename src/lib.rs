pub mod cli;
pub mod configuration;
pub mod console;
pub mod health;
pub mod models;
pub mod telemetry;
