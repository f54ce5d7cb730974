//! List-row helpers: preview snippet and title fallback.

const PREVIEW_MAX_CHARS: usize = 100;
const PREVIEW_ELLIPSIS: &str = "...";
const UNTITLED: &str = "Untitled";

/// First 100 characters of `content`, with `...` appended when truncated.
pub fn preview_text(content: &str) -> String {
    let mut preview: String = content.chars().take(PREVIEW_MAX_CHARS).collect();
    if content.chars().nth(PREVIEW_MAX_CHARS).is_some() {
        preview.push_str(PREVIEW_ELLIPSIS);
    }
    preview
}

/// Title to show in lists; empty titles fall back to a placeholder.
pub fn display_title(title: &str) -> &str {
    if title.is_empty() {
        UNTITLED
    } else {
        title
    }
}
