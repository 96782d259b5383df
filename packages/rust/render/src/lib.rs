//! HTML fragment generation for the catalogue page.
//!
//! Everything here is pure string assembly: the table header, one row per
//! object record, and literal `{{placeholder}}` substitution into the index
//! template. Filesystem work lives in `qsocat-core`.

pub mod cell;

use std::sync::LazyLock;

use regex::Regex;
use tracing::warn;

use qsocat_shared::{BUILD_RECORDS_DIR, ObjectRecord};

pub use cell::{ADS_ABSTRACT_ROOT, CellKind, FIRST_AUTHOR_KEY, REFERENCE_COLUMNS};

/// Placeholder replaced by the configured site title.
pub const TITLE_PLACEHOLDER: &str = "{{site-title}}";
/// Placeholder replaced by the table header row.
pub const HEAD_PLACEHOLDER: &str = "{{table_head}}";
/// Placeholder replaced by the table body rows.
pub const BODY_PLACEHOLDER: &str = "{{table_body}}";

/// Anchor element for `url` that opens in a new page.
pub fn href(url: &str, text: &str) -> String {
    format!("<a href=\"{url}\" target=\"_blank\">{text}</a>")
}

/// Header row with one column header per title, in order.
pub fn table_head(titles: &[String]) -> String {
    let mut head = String::from("<tr>");
    for title in titles {
        head.push_str(&format!("<th scope=\"col\">{title}</th>"));
    }
    head.push_str("</tr>");
    head
}

/// One table row for `record`.
///
/// The first configured column is the name column and becomes a download
/// link to the record file; the remaining columns are data cells.
pub fn table_row(record: &ObjectRecord, columns: &[String], base_url: &str) -> String {
    let url = format!("{base_url}{BUILD_RECORDS_DIR}/{}", record.file_name());
    let mut row = format!(
        "<tr><th scope=\"row\">{}</th>",
        href(&url, record.name())
    );

    for column in columns.iter().skip(1) {
        if !record.fields().contains_key(column) {
            warn!(record = record.name(), column = %column, "record has no value for column");
            row.push_str("<td></td>");
            continue;
        }
        let kind = CellKind::resolve(column, record);
        row.push_str(&format!("<td>{}</td>", kind.render(column, record)));
    }

    row.push_str("</tr>\n");
    row
}

/// Substitute title, header and body into the index template.
pub fn render_index(template: &str, title: &str, head: &str, body: &str) -> String {
    template
        .replace(TITLE_PLACEHOLDER, title)
        .replace(HEAD_PLACEHOLDER, head)
        .replace(BODY_PLACEHOLDER, body)
}

/// `{{...}}` markers still present in rendered HTML.
pub fn leftover_placeholders(html: &str) -> Vec<String> {
    static PLACEHOLDER_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"\{\{[A-Za-z0-9_-]+\}\}").expect("valid regex"));

    PLACEHOLDER_RE
        .find_iter(html)
        .map(|m| m.as_str().to_string())
        .collect()
}
