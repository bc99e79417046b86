// Result Page Rendering
// Standalone HTML page with the highlighted document and the problem list

use crate::models::ValidationReport;
use crate::services::detection::highlight::render_text;

/// Render the validation result page.
///
/// A report with problems carries escaped highlight markup in `rendered` and
/// is embedded as-is. Without problems `rendered` is the untouched document,
/// so it is escaped here.
pub fn render_result_page(report: &ValidationReport) -> String {
    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str("<title>Policy Validation Result</title>\n</head>\n<body>\n");
    html.push_str("<h1>Validation Result</h1>\n");

    if report.has_problems() {
        html.push_str(&format!(
            "<p>{} of {} paragraph(s) flagged as problematic.</p>\n",
            report.problems.len(),
            report.paragraphs.len().max(report.problems.len())
        ));
    } else {
        html.push_str("<p>No problematic paragraphs found.</p>\n");
    }

    html.push_str("<div class=\"document\">\n");
    if report.has_problems() {
        html.push_str(&report.rendered);
    } else {
        html.push_str(&render_text(&report.rendered));
    }
    html.push_str("\n</div>\n");

    if report.has_problems() {
        html.push_str("<h2>Problems</h2>\n<ol>\n");
        for problem in &report.problems {
            html.push_str(&format!("<li>{}</li>\n", render_text(problem)));
        }
        html.push_str("</ol>\n");
    }

    html.push_str("</body>\n</html>\n");
    html
}
