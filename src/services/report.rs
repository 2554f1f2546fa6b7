//! Printable non-validation report sent to suppliers. Plain html, printed to pdf by the
//! browser.

use chrono::{DateTime, Utc};

use models::{Product, Sample};

const STYLE: &str = r#"
    * { box-sizing: border-box; margin: 0; padding: 0; }
    body { font-family: Arial, sans-serif; color: #1a1a1a; padding: 40px; }
    .header { border-bottom: 2px solid #7e22ce; padding-bottom: 20px; margin-bottom: 30px; }
    .header h1 { font-size: 22px; color: #7e22ce; }
    .header p { font-size: 13px; color: #666; margin-top: 6px; }
    .badge { display: inline-block; background: #fef2f2; color: #b91c1c; border: 1px solid #fca5a5;
             border-radius: 4px; padding: 3px 10px; font-size: 12px; font-weight: bold; margin-top: 8px; }
    .section { margin-bottom: 24px; }
    .section h2 { font-size: 14px; color: #374151; border-left: 3px solid #7e22ce; padding-left: 10px; margin-bottom: 10px; }
    .info-grid { display: grid; grid-template-columns: 1fr 1fr; gap: 12px; }
    .info-item { background: #f9fafb; border: 1px solid #e5e7eb; border-radius: 6px; padding: 10px 14px; }
    .label { font-size: 11px; color: #6b7280; text-transform: uppercase; }
    .value { font-size: 13px; color: #111827; margin-top: 2px; }
    .notes { background: #fff7ed; border: 1px solid #fed7aa; border-radius: 6px; padding: 14px;
             font-size: 13px; line-height: 1.6; white-space: pre-wrap; }
    .photos { display: grid; grid-template-columns: repeat(3, 1fr); gap: 10px; }
    .photos img { width: 100%; height: 160px; object-fit: cover; border-radius: 4px; border: 1px solid #e5e7eb; }
    .footer { margin-top: 40px; border-top: 1px solid #e5e7eb; padding-top: 16px; font-size: 11px; color: #9ca3af; text-align: center; }
    @media print { body { padding: 20px; } }
"#;

pub fn escape_html(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }
    escaped
}

fn info_item(label: &str, value: &str) -> String {
    format!(
        r#"<div class="info-item"><div class="label">{}</div><div class="value">{}</div></div>"#,
        label,
        escape_html(value)
    )
}

pub fn render_non_validation_report(product: &Product, sample: Option<&Sample>, generated_at: DateTime<Utc>) -> String {
    let review_notes = sample.and_then(|s| s.review_notes.as_ref()).map(|s| s.trim()).unwrap_or("");
    let review_photos = sample.map(|s| s.review_photo_paths.as_slice()).unwrap_or(&[]);

    let mut sections = String::new();
    sections.push_str(&format!(
        r#"<div class="section"><h2>Product</h2><div class="info-grid">{}{}{}{}</div></div>"#,
        info_item("Name", &product.name),
        info_item("SKU", &product.sku),
        info_item("Family", &product.family),
        info_item("Season", &format!("{} {}", product.season, product.year)),
    ));
    if !review_notes.is_empty() {
        sections.push_str(&format!(
            r#"<div class="section"><h2>Points to fix</h2><div class="notes">{}</div></div>"#,
            escape_html(review_notes)
        ));
    }
    if !review_photos.is_empty() {
        let images = review_photos
            .iter()
            .map(|path| format!(r#"<img src="{}" alt="Detail to review" />"#, escape_html(path)))
            .collect::<Vec<_>>()
            .join("");
        sections.push_str(&format!(
            r#"<div class="section"><h2>Details to review ({})</h2><div class="photos">{}</div></div>"#,
            review_photos.len(),
            images
        ));
    }

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<title>Sample non-validation report: {name}</title>
<style>{style}</style>
</head>
<body>
<div class="header">
<h1>Sample non-validation report</h1>
<p>Generated on {generated_at}</p>
<span class="badge">NOT VALIDATED</span>
</div>
{sections}
<div class="footer">
<p>Confidential, intended for the supplier</p>
<p>Product: {name} · SKU: {sku}</p>
</div>
</body>
</html>
"#,
        name = escape_html(&product.name),
        sku = escape_html(&product.sku),
        style = STYLE,
        generated_at = generated_at.format("%Y-%m-%d %H:%M UTC"),
        sections = sections,
    )
}
