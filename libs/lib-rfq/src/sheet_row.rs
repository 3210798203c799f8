use indexmap::IndexMap;

/// One spreadsheet row keyed by normalized column name, in column order.
pub type SheetRow = IndexMap<String, String>;

const DUPLICATE_SUFFIX: &str = "_2";

/// `"Vendor Quotation Status"` -> `"vendor_quotation_status"`.
/// Hyphens are dropped, not turned into `_`: `"Post-Offer Query"` is
/// `postoffer_query`, so a sheet spelling it that way never feeds the
/// `post_offer_query` status rule.
fn normalize_header(header: &str) -> String {
    header
        .trim()
        .to_lowercase()
        .replace(' ', "_")
        .replace(['.', '-'], "")
}

/// Zip a header row with one data row.
///
/// Missing trailing cells become empty strings. A header seen twice gets a
/// `_2` suffix on its second occurrence. Only that one level is handled: a
/// third duplicate lands on the same `_2` key and replaces its value.
pub fn normalize_row<H, V>(headers: &[H], values: &[V]) -> SheetRow
where
    H: AsRef<str>,
    V: AsRef<str>,
{
    let mut row = SheetRow::with_capacity(headers.len());

    for (i, header) in headers.iter().enumerate() {
        let mut key = normalize_header(header.as_ref());
        if row.contains_key(&key) {
            key.push_str(DUPLICATE_SUFFIX);
        }

        let value = values
            .get(i)
            .map(|v| v.as_ref().to_string())
            .unwrap_or_default();
        row.insert(key, value);
    }

    row
}
