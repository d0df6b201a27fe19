//! Display and visualization utilities for qlink.
//!
//! Provides tree rendering for resolved schemas and small text helpers.

mod tree;

pub use tree::{DisplayTree, TextNode, TreeNode};

/// Truncate text to at most `max_len` characters, marking the cut with `...`.
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        return s.to_string();
    }
    let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
    format!("{kept}...")
}
