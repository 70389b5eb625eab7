//! Common test infrastructure
//!
//! Fixtures for on-disk catalogs and release inputs, plus a mock Telegram
//! Bot API server. Tests should only import from this module.
//!
//! # Example
//!
//! ```no_run
//! mod common;
//! use common::MockTelegram;
//!
//! #[tokio::test]
//! async fn test_send() {
//!     let telegram = MockTelegram::spawn().await;
//!     let client = telegram.client();
//!     // ...
//!     assert_eq!(telegram.requests().len(), 1);
//! }
//! ```

mod constants;
mod fixtures;
mod telegram;

pub use constants::*;
#[allow(unused_imports)]
pub use fixtures::{release_inputs, sample_release, write_catalog};
#[allow(unused_imports)]
pub use telegram::{MockTelegram, RecordedRequest};
