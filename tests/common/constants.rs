//! Shared constants for integration tests.

#![allow(dead_code)]

/// Public base URL handed to the local asset publisher.
pub const CDN_BASE_URL: &str = "https://cdn.test";

pub const SITE_URL: &str = "https://deeppi.app";

pub const BOT_TOKEN: &str = "123456:test-token";

pub const CHANNEL_ID: &str = "@deeppi_test";

/// MD5 of an empty file.
pub const EMPTY_MD5: &str = "d41d8cd98f00b204e9800998ecf8427e";
