use html2text::render::text_renderer::TrivialDecorator;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::latest_message::RE_BLANK_LINES;

/// Wide enough that html2text does not wrap ordinary email lines.
const TEXT_WIDTH: usize = 1000;

/// Comments, scripts, styles and images carry nothing worth extracting
static STRIP_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<!--.*?-->|<script\b.*?</script\s*>|<style\b.*?</style\s*>|<img\b[^>]*>")
        .unwrap()
});

/// Cell and row ends become line breaks so each cell reads as its own line.
static TABLE_BREAK_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)</t[dhr]\s*>").unwrap());

/// Remaining table tags are dropped, otherwise html2text draws the grid.
static TABLE_TAG_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)</?(?:table|caption|colgroup|col|thead|tbody|tfoot|tr|td|th)\b[^>]*>").unwrap()
});

static URL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"https?://\S+").unwrap());

/// Render an HTML email body as plain text.
///
/// Block elements become line breaks, URLs are dropped and blank-line runs are
/// collapsed. Link targets are not rendered, only their visible text.
pub fn html_to_text(html: &str) -> String {
    if html.trim().is_empty() {
        return String::new();
    }

    let stripped = STRIP_RE.replace_all(html, "");
    let stripped = TABLE_BREAK_RE.replace_all(&stripped, "<br>");
    let stripped = TABLE_TAG_RE.replace_all(&stripped, "");
    let text: String = html2text::from_read_with_decorator(
        stripped.as_bytes(),
        TEXT_WIDTH,
        TrivialDecorator::new(),
    );
    let text = URL_RE.replace_all(&text, "");
    let text = RE_BLANK_LINES.replace_all(&text, "\n");
    text.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blocks_become_lines() {
        let html = "<html><body><p>RFQ: 4410</p><div>Qty: 5</div></body></html>";
        let text = html_to_text(html);
        let lines: Vec<&str> = text.lines().map(str::trim).collect();
        assert_eq!(lines, vec!["RFQ: 4410", "Qty: 5"]);
    }

    #[test]
    fn test_scripts_styles_and_images_are_removed() {
        let html = r#"<style>p { color: red; }</style>
            <script>alert("x")</script>
            <p>Visible<img src="logo.png" alt="Logo"></p>
            <!-- hidden comment -->"#;
        let text = html_to_text(html);
        assert_eq!(text, "Visible");
    }

    #[test]
    fn test_urls_are_stripped() {
        let html = r#"<p>See https://example.com/rfq?id=1 for drawings</p><p><a href="https://x.io">portal</a></p>"#;
        let text = html_to_text(html);
        assert!(!text.contains("http"));
        assert!(text.contains("See"));
        assert!(text.contains("for drawings"));
        assert!(text.contains("portal"));
    }

    #[test]
    fn test_no_blank_line_runs() {
        let html = "<p>one</p><br><br><br><p>two</p>";
        let text = html_to_text(html);
        assert!(!text.contains("\n\n"));
        assert!(text.starts_with("one"));
        assert!(text.ends_with("two"));
    }

    #[test]
    fn test_table_cells_become_lines() {
        let html = "<table><tr><td>RFQ: 1</td><td>Qty: 2</td></tr>\
                    <tr><th>Description</th><td>Pump seal</td></tr></table>\
                    <ul><li>a</li><li>b</li></ul><p>Hi &amp; bye</p>";
        let text = html_to_text(html);

        assert!(!text.contains(|c: char| ('\u{2500}'..='\u{257F}').contains(&c)));
        let lines: Vec<&str> = text.lines().map(str::trim).filter(|l| !l.is_empty()).collect();
        assert_eq!(
            lines,
            vec!["RFQ: 1", "Qty: 2", "Description", "Pump seal", "a", "b", "Hi & bye"]
        );
    }

    #[test]
    fn test_empty_html() {
        assert_eq!(html_to_text(""), "");
        assert_eq!(html_to_text("   "), "");
    }
}
