//! HTML output format for call-tree reports
//!
//! Standalone page with embedded CSS; every duration and percentage carries a
//! `speed-*` class derived from its severity bucket.

use crate::percentage::NO_PERCENT;
use crate::severity::Severity;
use crate::view::VisibleRow;

/// Pixels of indentation per nesting level
const INDENT_PX: usize = 10;

/// HTML output formatter
#[derive(Debug)]
pub struct HtmlOutput {
    title: String,
    rows: Vec<VisibleRow>,
}

impl HtmlOutput {
    pub fn new(title: &str, rows: Vec<VisibleRow>) -> Self {
        Self {
            title: title.to_string(),
            rows,
        }
    }

    /// Escape HTML special characters to prevent XSS
    fn escape_html(text: &str) -> String {
        text.replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;")
            .replace('"', "&quot;")
            .replace('\'', "&#39;")
    }

    /// CSS class of a severity bucket
    fn speed_class(severity: Severity) -> String {
        format!("speed-{}", severity.label())
    }

    /// Generate embedded CSS styles
    fn generate_styles() -> &'static str {
        r#"
        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
            margin: 20px;
            background-color: #f5f5f5;
        }
        h1 {
            color: #333;
        }
        table {
            border-collapse: collapse;
            width: 100%;
            background-color: white;
            box-shadow: 0 1px 3px rgba(0,0,0,0.1);
        }
        td {
            border-bottom: 1px solid #eee;
            padding: 4px 8px;
            font-family: monospace;
        }
        tr.root td {
            font-weight: bold;
        }
        .duration {
            display: inline-block;
            min-width: 90px;
        }
        .marker {
            display: inline-block;
            width: 18px;
            color: #888;
        }
        .speed-very-slow { color: #cc0000; }
        .speed-slow { color: #e06000; }
        .speed-medium { color: #c0a000; }
        .speed-fast { color: #4a90d9; }
        .speed-fastest { color: #5cb85c; }
        .footer {
            margin-top: 20px;
            font-size: 0.8em;
            color: #888;
            text-align: center;
        }
        "#
    }

    fn format_row(row: &VisibleRow) -> String {
        let speed = Self::speed_class(row.severity);
        let marker = match (row.has_children, row.expanded) {
            (false, _) => "",
            (true, false) => "+",
            (true, true) => "-",
        };
        let percent = match &row.percent {
            Some(share) => format!(
                r#" <span class="{}">[{}]</span>"#,
                Self::speed_class(share.severity),
                share
            ),
            None if row.depth > 0 => format!(" [{}]", NO_PERCENT),
            None => String::new(),
        };
        let row_class = if row.depth == 0 { "root" } else { "subcall" };

        format!(
            r#"<tr class="{}" id="call-{}"><td style="padding-left: {}px"><span class="duration"><span class="{}">{}</span>{}</span><span class="marker">{}</span><span class="{}">{}</span></td></tr>"#,
            row_class,
            Self::escape_html(&row.id.to_string()),
            INDENT_PX * (row.depth + 1),
            speed,
            Self::escape_html(&row.duration),
            percent,
            marker,
            speed,
            Self::escape_html(&row.name)
        )
    }

    /// Generate complete HTML document
    pub fn to_html(&self) -> String {
        let mut html = String::new();

        html.push_str("<!DOCTYPE html>\n");
        html.push_str("<html lang=\"en\">\n");

        html.push_str("<head>\n");
        html.push_str("    <meta charset=\"UTF-8\">\n");
        html.push_str(
            "    <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n",
        );
        html.push_str(&format!(
            "    <title>{}</title>\n",
            Self::escape_html(&self.title)
        ));
        html.push_str("    <style>");
        html.push_str(Self::generate_styles());
        html.push_str("</style>\n");
        html.push_str("</head>\n");

        html.push_str("<body>\n");
        html.push_str(&format!("    <h1>{}</h1>\n", Self::escape_html(&self.title)));

        html.push_str("    <table>\n");
        for row in &self.rows {
            html.push_str("        ");
            html.push_str(&Self::format_row(row));
            html.push('\n');
        }
        html.push_str("    </table>\n");

        html.push_str("    <div class=\"footer\">\n");
        html.push_str("        Generated by Arbol - Call Tree Viewer\n");
        html.push_str("    </div>\n");

        html.push_str("</body>\n");
        html.push_str("</html>\n");

        html
    }
}
