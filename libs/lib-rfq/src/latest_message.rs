use regex::Regex;

const RE_REPLY_HEADER_STR: &str = r"(?i)\nOn .*wrote:";
const RE_FORWARD_HEADER_STR: &str = r"\nFrom: ";
const RE_ORIGINAL_MESSAGE_STR: &str = r"(?i)Original Message";
const RE_SIGN_OFF_STR: &str = r"Regards,|Warm Regards,|Best Regards,|Thanks,|Thank you";
const RE_QUOTE_MARKER_STR: &str = r"(?m)^>+ ?";
const RE_BLANK_LINES_STR: &str = r"\n{2,}";

lazy_static::lazy_static!(
    static ref RE_REPLY_HEADER: Regex = Regex::new(RE_REPLY_HEADER_STR).unwrap();
    static ref RE_FORWARD_HEADER: Regex = Regex::new(RE_FORWARD_HEADER_STR).unwrap();
    static ref RE_ORIGINAL_MESSAGE: Regex = Regex::new(RE_ORIGINAL_MESSAGE_STR).unwrap();
    static ref RE_SIGN_OFF: Regex = Regex::new(RE_SIGN_OFF_STR).unwrap();
    static ref RE_QUOTE_MARKER: Regex = Regex::new(RE_QUOTE_MARKER_STR).unwrap();
    pub(crate) static ref RE_BLANK_LINES: Regex = Regex::new(RE_BLANK_LINES_STR).unwrap();
);

/// Keep only the text before the first match of `re`.
fn cut_at<'h>(text: &'h str, re: &Regex) -> &'h str {
    match re.find(text) {
        Some(m) => &text[..m.start()],
        None => text,
    }
}

/// Isolate the most recent reply of an email thread.
///
/// Quoted history, forwarded headers and the sign-off are cut away in a fixed
/// order, each cut applying to what the previous one left. Quote markers are
/// then stripped from every line and blank-line runs are collapsed.
pub fn truncate_to_latest_message(text: &str) -> String {
    if text.trim().is_empty() {
        return String::new();
    }

    let text = text.replace('\r', "");
    let cut = [
        &*RE_REPLY_HEADER,
        &*RE_FORWARD_HEADER,
        &*RE_ORIGINAL_MESSAGE,
        &*RE_SIGN_OFF,
    ]
    .into_iter()
    .fold(text.as_str(), cut_at);

    let unquoted = RE_QUOTE_MARKER.replace_all(cut, "");
    let collapsed = RE_BLANK_LINES.replace_all(&unquoted, "\n");
    collapsed.trim().to_string()
}
