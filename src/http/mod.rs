//! HTTP client used for asset downloads.

mod client;

pub use client::{BROWSER_USER_AGENT, HttpClient};
