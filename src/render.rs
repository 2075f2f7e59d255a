//! HTML presentation of a [`Listing`].
//!
//! The page posts two messages back to the host: `revealFile` from the
//! archive path in the header and `openFile` from each entry link. Both carry
//! their target in a `data-` attribute so names never need JS escaping.

use crate::listing::{Listing, ListingRow};

const PAGE_STYLE: &str = r#"
      li {
        margin-bottom: 10px;
      }
      table, th, td {
        border: 1px solid white;
        vertical-align: top;
        border-collapse: collapse;
      }
      th, td {
        padding: 10px;
      }
      table {
        width: 100%
      }"#;

const PAGE_SCRIPT: &str = r#"
      const hostApi = typeof acquireVsCodeApi === 'function' ? acquireVsCodeApi() : null;
      function post(message) {
        if (hostApi) {
          hostApi.postMessage(message);
        } else {
          window.parent.postMessage(message, '*');
        }
      }
      function openFileFromZip(name) {
        post({ command: 'openFile', entryName: name });
      }
      function revealFile(path) {
        post({ command: 'revealFile', path: path });
      }"#;

/// Escape text for HTML element content and quoted attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Header cell: archive path link and the size line.
pub fn render_header(listing: &Listing) -> String {
    let path = escape_html(&listing.archive_path.to_string_lossy());
    format!(
        "<a href=\"#\" data-path=\"{path}\" onclick=\"revealFile(this.dataset.path);return false;\">{path}</a><br/>\
         <p style=\"color:Tomato;\">file size : {}</p>",
        escape_html(&listing.size_label())
    )
}

/// One `<li>` for a file entry. An empty comment emits nothing.
pub fn render_row(row: &ListingRow) -> String {
    let name = escape_html(&row.name);
    let mut html = format!(
        "<li><a href=\"#\" data-entry=\"{name}\" onclick=\"openFileFromZip(this.dataset.entry);return false;\">{name}</a><br/>"
    );
    if !row.comment.is_empty() {
        html.push_str(&format!(
            "<span class=\"comment\">{}</span><br/>",
            escape_html(&row.comment)
        ));
    }
    html.push_str(&format!("size: {} <br/></li>", row.size_annotation()));
    html
}

/// Listing table: header row above the ordered entry list.
pub fn render_body(listing: &Listing) -> String {
    let rows: String = listing.rows.iter().map(render_row).collect();
    format!(
        "<table>\n  <tr>\n    <td colspan=2>{}</td>\n  </tr>\n  <tr>\n    <td width=50%><ol>{rows}</ol></td>\n    <td width=50%></td>\n  </tr>\n</table>",
        render_header(listing)
    )
}

/// Complete standalone page for a listing.
pub fn render_page(listing: &Listing) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n  <meta charset=\"UTF-8\">\n  <title>Zip File Viewer</title>\n  <style media=\"all\">{PAGE_STYLE}\n  </style>\n  <script>{PAGE_SCRIPT}\n  </script>\n</head>\n<body>\n{}\n</body>\n</html>\n",
        render_body(listing)
    )
}
