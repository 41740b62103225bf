//! CampusMeet core engine
//!
//! Backend engine for a campus event-meetup app: capacity-bounded group
//! events, join/leave/ban membership, a friend-request -> friendship social
//! graph, and membership-gated chat streams.
//!
//! ## Architecture
//!
//! - **core_store**: abstract document store with per-document atomic
//!   operations (memory and SQLite backends)
//! - **core_auth**: identity and captcha capability seams, consumed as traits
//! - **core_social**: the engines — membership, social graph, chat access —
//!   plus the async service facade request handlers call into
//!
//! HTTP transport, routing, and the identity provider itself live outside
//! this crate; handlers pass bearer tokens in and map error kinds out.

pub mod config;
pub mod core_auth;
pub mod core_social;
pub mod core_store;
pub mod logging;
pub mod test_utils;

pub use logging::{init_logging, LogLevel};
