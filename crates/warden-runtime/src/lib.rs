//! Runtime wiring for the StarWarden gate: configuration loading and the
//! durable RocksDB store. The binary in `main.rs` assembles these with the
//! core service.

pub mod config;
pub mod storage;

pub use config::{ConfigError, WardenConfig};
pub use storage::{RocksConfig, RocksStore};
