//! Listing filters over in-memory note collections.
//!
//! # Responsibility
//! - Keep substring matching rules in one place for active and trash lists.

pub mod filter;
