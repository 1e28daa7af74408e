//! Attendance record to receipt snapshot mapping
//!
//! Pure, infallible mapping: a partially-populated backend row still yields
//! a printable (if imperfect) receipt. Unknown status or verification codes
//! pass through instead of erroring, so a backend enum addition never aborts
//! receipt generation.

use chrono::{DateTime, Utc};
use recibo_printer::PaperWidth;

use crate::store::{AttendanceRecordRow, ReceiptTemplateRow};

use super::types::{ActivityInfo, AttendanceInfo, ReceiptData, StudentInfo, TemplateInfo};

const RECEIPT_TITLE: &str = "COMPROVANTE DE PRESENCA";
const DEFAULT_TEMPLATE_NAME: &str = "Comprovante Padrao";

/// Display label for an attendance status code
///
/// Unknown codes are upper-cased and passed through.
fn status_label(status: &str) -> String {
    match status {
        "presente" => "PRESENTE".to_string(),
        "ausente" => "AUSENTE".to_string(),
        "atrasado" => "ATRASADO".to_string(),
        "saida_antecipada" => "SAIDA ANTECIPADA".to_string(),
        other => other.to_uppercase(),
    }
}

/// Display label for a verification method code
///
/// Unknown codes pass through unchanged.
fn verification_label(method: &str) -> String {
    match method {
        "manual" => "Manual".to_string(),
        "biometric" => "Biometria".to_string(),
        "facial" => "Reconhecimento Facial".to_string(),
        "qr_code" => "QR Code".to_string(),
        "card" => "Cartao".to_string(),
        other => other.to_string(),
    }
}

/// Paper width encoded in a template's `paper_size` field
///
/// Anything that is not explicitly 58mm is treated as 80mm.
fn template_paper_width(paper_size: &str) -> PaperWidth {
    if paper_size.contains("58") {
        PaperWidth::Mm58
    } else {
        PaperWidth::Mm80
    }
}

/// Build the immutable receipt snapshot from a record and optional template
///
/// `issued_at` is the generation instant; it doubles as the activity date
/// when the record carries no check-in time.
pub fn assemble(
    record: &AttendanceRecordRow,
    template: Option<&ReceiptTemplateRow>,
    institution: &str,
    footer: &str,
    issued_at: DateTime<Utc>,
) -> ReceiptData {
    let kind = if record.event_id.is_some() {
        "Evento"
    } else {
        "Aula"
    };

    let template_info = match template {
        Some(t) => TemplateInfo {
            id: Some(t.id.clone()),
            name: t.name.clone(),
            paper_width: template_paper_width(&t.paper_size),
        },
        None => TemplateInfo {
            id: None,
            name: DEFAULT_TEMPLATE_NAME.to_string(),
            paper_width: PaperWidth::Mm80,
        },
    };

    let footer = template
        .and_then(|t| t.footer_text.clone())
        .unwrap_or_else(|| footer.to_string());

    ReceiptData {
        attendance_record_id: record.id.clone(),
        institution: institution.to_string(),
        title: RECEIPT_TITLE.to_string(),
        student: StudentInfo {
            id: record.student_id.clone(),
            name: record.student_name.clone().unwrap_or_default(),
            badge_number: record.badge_number.clone(),
        },
        activity: ActivityInfo {
            kind: kind.to_string(),
            name: record.activity_name.clone().unwrap_or_default(),
            subject: record.subject_name.clone(),
            date: record.check_in_time.unwrap_or(issued_at),
            check_in: record.check_in_time,
            check_out: record.check_out_time,
        },
        attendance: AttendanceInfo {
            status: record.status.clone(),
            status_label: status_label(&record.status),
            verification_label: verification_label(&record.verification_method),
            notes: record.notes.clone(),
        },
        template: template_info,
        footer,
        qr_payload: Some(format!(
            "mieadi:presenca:{}:{}",
            record.id, record.student_id
        )),
        generated_at: issued_at,
    }
}
