//! Fixed-order markup-to-HTML pipeline.
//!
//! Rules run in this order, each re-scanning the output of the previous one:
//! bold, italic, headers, internal links, external links, paragraphs.
//! Paragraph wrapping runs last and wraps whatever came before verbatim, so a
//! heading can end up inside `<p>`. That output is kept as-is.
//!
//! This is not a Markdown parser; input is not HTML-escaped.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static BOLD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\*\*(.*?)\*\*").expect("valid bold regex"));
static ITALIC_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*(.*?)\*").expect("valid italic regex"));
static H3_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?mR)^### (.*)$").expect("valid h3 regex"));
static H2_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?mR)^## (.*)$").expect("valid h2 regex"));
static H1_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?mR)^# (.*)$").expect("valid h1 regex"));
static INTERNAL_LINK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[\[(.*?)\]\]").expect("valid internal link regex"));
static EXTERNAL_LINK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").expect("valid external link regex"));

const PARAGRAPH_BREAK: &str = "\n\n";

/// Renders note source to HTML.
pub fn render(source: &str) -> String {
    let text = render_bold(source);
    let text = render_italic(&text);
    let text = render_headers(&text);
    let text = render_internal_links(&text);
    let text = render_external_links(&text);
    wrap_paragraphs(&text)
}

/// `**X**` -> `<strong>X</strong>`, non-greedy.
pub fn render_bold(text: &str) -> String {
    BOLD_RE.replace_all(text, "<strong>${1}</strong>").into_owned()
}

/// `*X*` -> `<em>X</em>`, non-greedy. Must run after [`render_bold`].
pub fn render_italic(text: &str) -> String {
    ITALIC_RE.replace_all(text, "<em>${1}</em>").into_owned()
}

/// Line-anchored `# `, `## `, `### ` headings, longest prefix first.
///
/// Lines may end in `\n` or `\r\n`; the line terminator stays outside the tag.
pub fn render_headers(text: &str) -> String {
    let text = H3_RE.replace_all(text, "<h3>${1}</h3>");
    let text = H2_RE.replace_all(&text, "<h2>${1}</h2>");
    H1_RE.replace_all(&text, "<h1>${1}</h1>").into_owned()
}

/// `[[Title]]` -> anchor resolved by title on activation.
///
/// The target title rides in `data-title`; the caller resolves it with
/// `NoteService::select_note_by_title`.
pub fn render_internal_links(text: &str) -> String {
    INTERNAL_LINK_RE
        .replace_all(text, |caps: &Captures<'_>| {
            let title = &caps[1];
            format!(
                r##"<a href="#" class="internal-link" data-title="{}">{}</a>"##,
                escape_attribute(title),
                title
            )
        })
        .into_owned()
}

/// `[Text](URL)` -> anchor opening in a new browsing context.
pub fn render_external_links(text: &str) -> String {
    EXTERNAL_LINK_RE
        .replace_all(text, r#"<a href="${2}" target="_blank">${1}</a>"#)
        .into_owned()
}

/// Splits on blank lines, wraps each block in `<p>`, drops empty `<p></p>`.
pub fn wrap_paragraphs(text: &str) -> String {
    let joined = text.replace(PARAGRAPH_BREAK, "</p><p>");
    format!("<p>{joined}</p>").replace("<p></p>", "")
}

/// Titles referenced by `[[...]]` links, in order of appearance.
pub fn internal_link_titles(source: &str) -> Vec<String> {
    INTERNAL_LINK_RE
        .captures_iter(source)
        .map(|caps| caps[1].to_string())
        .collect()
}

fn escape_attribute(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bold_runs_before_italic() {
        assert_eq!(render_bold("**a** and *b*"), "<strong>a</strong> and *b*");
        assert_eq!(
            render_italic(&render_bold("**a** and *b*")),
            "<strong>a</strong> and <em>b</em>"
        );
    }

    #[test]
    fn bold_is_non_greedy() {
        assert_eq!(
            render_bold("**a** x **b**"),
            "<strong>a</strong> x <strong>b</strong>"
        );
    }

    #[test]
    fn headers_are_anchored_to_line_start() {
        assert_eq!(render_headers("# T"), "<h1>T</h1>");
        assert_eq!(render_headers("## T"), "<h2>T</h2>");
        assert_eq!(render_headers("### T"), "<h3>T</h3>");
        assert_eq!(render_headers("x # T"), "x # T");
        assert_eq!(render_headers("a\n## B\nc"), "a\n<h2>B</h2>\nc");
    }

    #[test]
    fn headers_stop_before_crlf() {
        assert_eq!(render_headers("# T\r\nbody"), "<h1>T</h1>\r\nbody");
        assert_eq!(render_headers("a\r\n### C\r\n"), "a\r\n<h3>C</h3>\r\n");
        assert_eq!(render("# T\r\nbody"), "<p><h1>T</h1>\r\nbody</p>");
    }

    #[test]
    fn header_without_space_is_plain_text() {
        assert_eq!(render_headers("#tag"), "#tag");
    }

    #[test]
    fn internal_link_carries_title() {
        assert_eq!(
            render_internal_links("see [[Daily Log]]"),
            r##"see <a href="#" class="internal-link" data-title="Daily Log">Daily Log</a>"##
        );
    }

    #[test]
    fn internal_link_title_is_attribute_escaped() {
        let html = render_internal_links(r#"[[say "hi"]]"#);
        assert!(html.contains(r#"data-title="say &quot;hi&quot;""#));
        assert!(html.ends_with(r#">say "hi"</a>"#));
    }

    #[test]
    fn external_link_opens_new_context() {
        assert_eq!(
            render_external_links("[docs](https://example.com)"),
            r#"<a href="https://example.com" target="_blank">docs</a>"#
        );
    }

    #[test]
    fn internal_link_is_not_reparsed_as_external() {
        let html = render("[[A]]");
        assert_eq!(html.matches("<a ").count(), 1);
    }

    #[test]
    fn paragraphs_split_on_blank_lines_and_drop_empties() {
        assert_eq!(wrap_paragraphs("a\n\nb"), "<p>a</p><p>b</p>");
        assert_eq!(wrap_paragraphs(""), "");
        assert_eq!(wrap_paragraphs("a\n\n\n\nb"), "<p>a</p><p>b</p>");
    }

    #[test]
    fn single_newline_stays_inside_paragraph() {
        assert_eq!(wrap_paragraphs("a\nb"), "<p>a\nb</p>");
    }

    #[test]
    fn full_pipeline_keeps_rule_order() {
        assert_eq!(
            render("**a** *b*\n\n# T"),
            "<p><strong>a</strong> <em>b</em></p><p><h1>T</h1></p>"
        );
    }

    #[test]
    fn link_titles_are_collected_in_order() {
        assert_eq!(
            internal_link_titles("[[B]] then [[A]] and [[B]]"),
            vec!["B".to_string(), "A".to_string(), "B".to_string()]
        );
    }
}
