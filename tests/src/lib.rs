//! # StarWarden Test Suite
//!
//! Unified test crate containing:
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── ledger_properties.rs   # Binding invariants on both stores
//!     ├── verification_flows.rs  # End-to-end state machine scenarios
//!     └── sync_and_status.rs     # Synchronization and reporting
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p warden-tests
//! cargo test -p warden-tests integration::
//! ```

#![allow(unused_imports)]
#![allow(dead_code)]

pub mod integration;
