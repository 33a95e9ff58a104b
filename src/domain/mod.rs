//! Domain models and types for Tenderflow.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Feed models** ([`ReleasePackage`], [`Release`]) decoded leniently from the release feed
//! - **The stored entity** ([`TenderRow`]) and its derived [`Stage`]
//! - **Identifiers** ([`Ocid`])
//! - **Error types** ([`TenderflowError`], [`FeedError`])
//! - **Result type alias** ([`Result`])
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T, TenderflowError>`]:
//!
//! ```rust
//! use tenderflow::domain::{FeedError, Result};
//!
//! fn example() -> Result<()> {
//!     let fetched: std::result::Result<(), FeedError> = Ok(());
//!     fetched?;
//!     Ok(())
//! }
//! ```

pub mod errors;
pub mod ids;
pub mod release;
pub mod result;
pub mod tender;

// Re-export commonly used types for convenience
pub use errors::{FeedError, TenderflowError};
pub use ids::Ocid;
pub use release::{Release, ReleasePackage};
pub use result::Result;
pub use tender::{Stage, TenderRow};
