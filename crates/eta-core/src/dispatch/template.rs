//! HTML rendering of decision records

use crate::models::{DecisionRecord, DecisionStatus};

/// Escape text for embedding in HTML element content
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

/// Heading colour for a status
pub fn status_color(status: DecisionStatus) -> &'static str {
    match status {
        DecisionStatus::Good => "#22c55e",
        DecisionStatus::Warning => "#f59e0b",
        DecisionStatus::Critical => "#ef4444",
        DecisionStatus::Error => "#6b7280",
    }
}

/// Email body for a decision report
pub fn render_email_html(record: &DecisionRecord) -> String {
    format!(
        r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;">
    <h2 style="color: {color};">Status: {status}</h2>
    <p><strong>Reason:</strong> {reason}</p>
    <p><strong>Immediate Action:</strong> {immediate}</p>
    <p><strong>Long-Term Recommendation:</strong> {long_term}</p>
    <hr style="border: 1px solid #e5e7eb; margin: 20px 0;" />
    <p style="color: #6b7280; font-size: 14px;">
        This decision was generated automatically by the AI Decision Assistant.
    </p>
</div>"#,
        color = status_color(record.status),
        status = record.status,
        reason = escape_html(&record.reason),
        immediate = escape_html(&record.immediate_action),
        long_term = escape_html(&record.long_term_recommendation),
    )
}

/// Status card shown in the UI after an analysis
pub fn render_decision_card(record: &DecisionRecord) -> String {
    let label = if record.is_error() {
        "Analysis unavailable"
    } else {
        "AI Decision"
    };
    format!(
        r#"<div class="decision-card status-{class}" style="border-left: 6px solid {color}; padding: 20px; border-radius: 16px; background: #f8fafc;">
    <div style="font-size:13px; color:#64748b;">{label}</div>
    <h3 style="color: {color}; margin: 6px 0 12px;">{status}</h3>
    <p><strong>Reason:</strong> {reason}</p>
    <p><strong>Immediate Action:</strong> {immediate}</p>
    <p><strong>Long-Term Recommendation:</strong> {long_term}</p>
</div>"#,
        class = record.status.as_str().to_ascii_lowercase(),
        color = status_color(record.status),
        label = label,
        status = record.status,
        reason = escape_html(&record.reason),
        immediate = escape_html(&record.immediate_action),
        long_term = escape_html(&record.long_term_recommendation),
    )
}
