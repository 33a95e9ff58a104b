//! Release transformation
//!
//! Turns one decoded [`Release`](crate::domain::Release) into the flat
//! [`TenderRow`](crate::domain::TenderRow) that is persisted, deriving the
//! stage, slug, CPV codes and region along the way.

pub mod slug;
pub mod stage;
pub mod tender;

pub use slug::slugify;
pub use stage::derive_stage;
pub use tender::{transform_release, TransformOptions};
