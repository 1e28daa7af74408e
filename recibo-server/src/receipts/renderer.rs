//! Receipt renderers
//!
//! Three output formats share one [`ReceiptData`] input: a fixed-width
//! thermal text layout, an HTML fragment, and a base64-encoded printable
//! document. All renderers are deterministic; every timestamp they show is
//! already part of the snapshot.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::{DateTime, Utc};
use recibo_printer::center_columns;

use super::types::{ReceiptData, ReceiptFormat};
use crate::utils::error::{AppError, AppResult};

fn format_date(ts: DateTime<Utc>) -> String {
    ts.format("%d/%m/%Y").to_string()
}

fn format_time(ts: DateTime<Utc>) -> String {
    ts.format("%H:%M").to_string()
}

/// Structured thermal layout: which lines exist and how each block aligns.
///
/// The plain-text renderer and the ESC/POS encoder both consume this, so
/// the printed ticket and the preview always carry the same field values.
#[derive(Debug, Clone)]
pub struct ThermalLayout {
    /// Centered header block (institution, title)
    pub header: Vec<String>,
    /// Left-aligned student block
    pub student: Vec<String>,
    /// Left-aligned activity block
    pub activity: Vec<String>,
    /// Centered, emphasized status label
    pub status: String,
    /// Left-aligned verification block
    pub verification: Vec<String>,
    /// Centered footer block
    pub footer: Vec<String>,
    pub qr_payload: Option<String>,
}

/// Build the thermal layout for a receipt
pub fn thermal_layout(data: &ReceiptData) -> ThermalLayout {
    let mut student = vec![format!("Aluno: {}", data.student.name)];
    if let Some(badge) = &data.student.badge_number {
        student.push(format!("Matricula: {}", badge));
    }

    let mut activity = vec![
        format!("{}: {}", data.activity.kind, data.activity.name),
    ];
    if let Some(subject) = &data.activity.subject {
        activity.push(format!("Disciplina: {}", subject));
    }
    activity.push(format!("Data: {}", format_date(data.activity.date)));
    if let Some(check_in) = data.activity.check_in {
        activity.push(format!("Entrada: {}", format_time(check_in)));
    }
    if let Some(check_out) = data.activity.check_out {
        activity.push(format!("Saida: {}", format_time(check_out)));
    }

    let mut verification = vec![format!(
        "Verificacao: {}",
        data.attendance.verification_label
    )];
    if let Some(notes) = &data.attendance.notes {
        verification.push(format!("Obs: {}", notes));
    }

    ThermalLayout {
        header: vec![data.institution.clone(), data.title.clone()],
        student,
        activity,
        status: data.attendance.status_label.clone(),
        verification,
        footer: vec![
            data.footer.clone(),
            format!(
                "Emitido em {} {}",
                format_date(data.generated_at),
                format_time(data.generated_at)
            ),
        ],
        qr_payload: data.qr_payload.clone(),
    }
}

/// Render the fixed-width plain-text ticket
///
/// Centering prefixes `floor((width - len) / 2)` spaces; an over-length
/// line is left intact and allowed to overflow the column width.
pub fn render_thermal(data: &ReceiptData, width: usize) -> String {
    let layout = thermal_layout(data);
    let rule_double = "=".repeat(width);
    let rule_single = "-".repeat(width);

    let mut lines = Vec::new();
    lines.push(rule_double.clone());
    for line in &layout.header {
        lines.push(center_columns(line, width));
    }
    lines.push(rule_double.clone());
    lines.extend(layout.student.iter().cloned());
    lines.extend(layout.activity.iter().cloned());
    lines.push(rule_single.clone());
    lines.push(center_columns(&layout.status, width));
    lines.extend(layout.verification.iter().cloned());
    lines.push(rule_single);
    for line in &layout.footer {
        lines.push(center_columns(line, width));
    }
    lines.push(rule_double);

    lines.join("\n")
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Render a self-contained HTML fragment (preview and PDF input)
pub fn render_html(data: &ReceiptData) -> String {
    let mut html = String::new();
    html.push_str("<div class=\"receipt\">\n");
    html.push_str(&format!(
        "  <h1>{}</h1>\n  <h2>{}</h2>\n",
        escape_html(&data.institution),
        escape_html(&data.title)
    ));

    html.push_str("  <dl>\n");
    let mut field = |label: &str, value: &str| {
        html.push_str(&format!(
            "    <dt>{}</dt><dd>{}</dd>\n",
            escape_html(label),
            escape_html(value)
        ));
    };
    field("Aluno", &data.student.name);
    if let Some(badge) = &data.student.badge_number {
        field("Matricula", badge);
    }
    field(&data.activity.kind, &data.activity.name);
    if let Some(subject) = &data.activity.subject {
        field("Disciplina", subject);
    }
    field("Data", &format_date(data.activity.date));
    if let Some(check_in) = data.activity.check_in {
        field("Entrada", &format_time(check_in));
    }
    if let Some(check_out) = data.activity.check_out {
        field("Saida", &format_time(check_out));
    }
    field("Verificacao", &data.attendance.verification_label);
    if let Some(notes) = &data.attendance.notes {
        field("Obs", notes);
    }
    html.push_str("  </dl>\n");

    html.push_str(&format!(
        "  <p class=\"status\">{}</p>\n",
        escape_html(&data.attendance.status_label)
    ));
    html.push_str(&format!(
        "  <footer>{}<br>Emitido em {} {}</footer>\n",
        escape_html(&data.footer),
        format_date(data.generated_at),
        format_time(data.generated_at)
    ));
    html.push_str("</div>\n");
    html
}

/// Render the printable document variant, base64-encoded
///
/// Wraps the HTML fragment in a minimal document. A real HTML-to-PDF
/// engine can replace the encoding step without touching the fragment.
pub fn render_pdf(data: &ReceiptData) -> String {
    let document = format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{}</title>\n</head>\n<body>\n{}</body>\n</html>\n",
        escape_html(&data.title),
        render_html(data)
    );
    BASE64.encode(document.as_bytes())
}

/// Render a receipt in the requested format
pub fn render(data: &ReceiptData, format: ReceiptFormat) -> AppResult<String> {
    let width = data.template.paper_width.columns();
    match format {
        ReceiptFormat::Thermal => Ok(render_thermal(data, width)),
        ReceiptFormat::Html => Ok(render_html(data)),
        ReceiptFormat::Pdf => {
            let encoded = render_pdf(data);
            if encoded.is_empty() {
                return Err(AppError::Render("empty document".to_string()));
            }
            Ok(encoded)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::receipts::types::{
        ActivityInfo, AttendanceInfo, ReceiptData, StudentInfo, TemplateInfo,
    };
    use chrono::TimeZone;
    use recibo_printer::PaperWidth;

    fn sample() -> ReceiptData {
        let issued = Utc.with_ymd_and_hms(2025, 3, 4, 19, 30, 0).unwrap();
        ReceiptData {
            attendance_record_id: "ar-1".to_string(),
            institution: "MIEADI".to_string(),
            title: "COMPROVANTE DE PRESENCA".to_string(),
            student: StudentInfo {
                id: "st-1".to_string(),
                name: "Maria Silva".to_string(),
                badge_number: Some("0042".to_string()),
            },
            activity: ActivityInfo {
                kind: "Aula".to_string(),
                name: "Culto de Terca".to_string(),
                subject: None,
                date: issued,
                check_in: Some(issued),
                check_out: None,
            },
            attendance: AttendanceInfo {
                status: "presente".to_string(),
                status_label: "PRESENTE".to_string(),
                verification_label: "Manual".to_string(),
                notes: None,
            },
            template: TemplateInfo {
                id: None,
                name: "Comprovante Padrao".to_string(),
                paper_width: PaperWidth::Mm58,
            },
            footer: "Comprovante gerado eletronicamente".to_string(),
            qr_payload: Some("mieadi:presenca:ar-1:st-1".to_string()),
            generated_at: issued,
        }
    }

    #[test]
    fn test_thermal_is_deterministic() {
        let data = sample();
        assert_eq!(render_thermal(&data, 32), render_thermal(&data, 32));
    }

    #[test]
    fn test_thermal_contains_field_values() {
        let text = render_thermal(&sample(), 32);
        assert!(text.contains("Maria Silva"));
        assert!(text.contains("Culto de Terca"));
        assert!(text.contains("PRESENTE"));
        assert!(text.contains("Manual"));
        assert!(text.contains("04/03/2025"));
    }

    #[test]
    fn test_thermal_header_centered_within_width() {
        let text = render_thermal(&sample(), 32);
        let header = text
            .lines()
            .find(|l| l.contains("MIEADI"))
            .unwrap();
        assert!(header.chars().count() <= 32);
        let padding = header.chars().take_while(|c| *c == ' ').count();
        assert_eq!(padding, (32 - "MIEADI".len()) / 2);
    }

    #[test]
    fn test_thermal_overlong_line_not_truncated() {
        let mut data = sample();
        data.institution = "INSTITUICAO COM NOME MUITO COMPRIDO PARA 32 COLUNAS".to_string();
        let text = render_thermal(&data, 32);
        assert!(text.contains(&data.institution));
    }

    #[test]
    fn test_html_escapes_markup() {
        let mut data = sample();
        data.student.name = "Maria <b>Silva</b>".to_string();
        let html = render_html(&data);
        assert!(html.contains("Maria &lt;b&gt;Silva&lt;/b&gt;"));
        assert!(!html.contains("<b>Silva</b>"));
    }

    #[test]
    fn test_pdf_wraps_fragment_in_document() {
        use base64::Engine;
        let encoded = render_pdf(&sample());
        let decoded = base64::engine::general_purpose::STANDARD
            .decode(encoded)
            .unwrap();
        let document = String::from_utf8(decoded).unwrap();
        assert!(document.starts_with("<!DOCTYPE html>"));
        assert!(document.contains("<div class=\"receipt\">"));
    }
}
