//! Release feed adapter
//!
//! [`ReleaseFeed`] is the seam the orchestrator reads pages through;
//! [`FeedClient`] implements it over HTTP.

pub mod backoff;
pub mod client;
pub mod source;

pub use client::FeedClient;
pub use source::ReleaseFeed;
