//! Session configuration for a header-sync engine using this crate.

pub mod config;

pub use config::Config;
