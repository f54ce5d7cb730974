//! Display-side transforms for note content.
//!
//! # Responsibility
//! - Convert note markup source into HTML for the preview pane.
//! - Derive short list previews.

pub mod markup;
pub mod preview;
