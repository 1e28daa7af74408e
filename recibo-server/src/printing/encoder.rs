//! ReceiptData to ESC/POS encoding
//!
//! Pure transform: the printer config supplies column width, character
//! encoding and cut behavior, the thermal layout supplies the lines. The
//! same layout feeds the plain-text renderer, so the printed ticket matches
//! the stored preview field for field.

use recibo_printer::{EscPosBuilder, PrinterConfig};

use crate::receipts::renderer::thermal_layout;
use crate::receipts::types::ReceiptData;

const QR_MODULE_SIZE: u8 = 6;

/// Encode a receipt into a printer command stream
pub fn encode_receipt(data: &ReceiptData, config: &PrinterConfig) -> Vec<u8> {
    let layout = thermal_layout(data);
    let mut b = EscPosBuilder::new(config.paper_width.columns(), config.encoding);

    b.sep_double();
    b.center();
    b.bold();
    for line in &layout.header {
        b.line(line);
    }
    b.bold_off();
    b.left();
    b.sep_double();

    for line in layout.student.iter().chain(layout.activity.iter()) {
        b.line(line);
    }
    b.sep_single();

    b.center();
    b.bold();
    b.double_height();
    b.line(&layout.status);
    b.reset_size();
    b.bold_off();
    b.left();

    for line in &layout.verification {
        b.line(line);
    }
    b.sep_single();

    if let Some(payload) = &layout.qr_payload {
        b.center();
        b.qr_code(payload, QR_MODULE_SIZE);
        b.left();
    }

    b.center();
    for line in &layout.footer {
        b.line(line);
    }
    b.left();

    b.feed(3);
    b.cut(config.cut_type);
    b.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::receipts::types::{
        ActivityInfo, AttendanceInfo, ReceiptData, StudentInfo, TemplateInfo,
    };
    use chrono::{TimeZone, Utc};
    use recibo_printer::{CharacterEncoding, CutType, PaperWidth};

    fn sample() -> ReceiptData {
        let issued = Utc.with_ymd_and_hms(2025, 3, 4, 19, 30, 0).unwrap();
        ReceiptData {
            attendance_record_id: "ar-1".to_string(),
            institution: "MIEADI".to_string(),
            title: "COMPROVANTE DE PRESENCA".to_string(),
            student: StudentInfo {
                id: "st-1".to_string(),
                name: "Maria Silva".to_string(),
                badge_number: None,
            },
            activity: ActivityInfo {
                kind: "Aula".to_string(),
                name: "Culto de Terca".to_string(),
                subject: None,
                date: issued,
                check_in: None,
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
            qr_payload: None,
            generated_at: issued,
        }
    }

    fn config() -> PrinterConfig {
        PrinterConfig {
            paper_width: PaperWidth::Mm58,
            encoding: CharacterEncoding::Utf8,
            cut_type: CutType::Partial,
            ..PrinterConfig::default()
        }
    }

    /// Keep printable bytes only, dropping ESC/GS command sequences
    fn strip_controls(bytes: &[u8]) -> String {
        let mut text = Vec::new();
        let mut i = 0;
        while i < bytes.len() {
            match bytes[i] {
                // ESC @ is two bytes, remaining ESC/GS commands here take one argument
                0x1B if bytes.get(i + 1) == Some(&0x40) => i += 2,
                0x1B | 0x1D => i += 3,
                b if b >= 0x20 || b == b'\n' => {
                    text.push(b);
                    i += 1;
                }
                _ => i += 1,
            }
        }
        String::from_utf8_lossy(&text).into_owned()
    }

    #[test]
    fn test_encoding_is_deterministic() {
        let data = sample();
        let cfg = config();
        assert_eq!(encode_receipt(&data, &cfg), encode_receipt(&data, &cfg));
    }

    #[test]
    fn test_starts_with_initialize() {
        let bytes = encode_receipt(&sample(), &config());
        assert_eq!(&bytes[..2], &[0x1B, 0x40]);
    }

    #[test]
    fn test_text_round_trip_preserves_fields() {
        let bytes = encode_receipt(&sample(), &config());
        let text = strip_controls(&bytes);
        assert!(text.contains("MIEADI"));
        assert!(text.contains("Maria Silva"));
        assert!(text.contains("Culto de Terca"));
        assert!(text.contains("PRESENTE"));
        assert!(text.contains("Manual"));
    }

    #[test]
    fn test_partial_cut_trailer() {
        let bytes = encode_receipt(&sample(), &config());
        assert_eq!(&bytes[bytes.len() - 3..], &[0x1D, 0x56, 0x01]);
    }

    #[test]
    fn test_cut_none_omits_cut_command() {
        let mut cfg = config();
        cfg.cut_type = CutType::None;
        let bytes = encode_receipt(&sample(), &cfg);
        assert_ne!(&bytes[bytes.len() - 3..], &[0x1D, 0x56, 0x00]);
        assert_ne!(&bytes[bytes.len() - 3..], &[0x1D, 0x56, 0x01]);
    }

    #[test]
    fn test_qr_payload_embedded() {
        let mut data = sample();
        data.qr_payload = Some("mieadi:presenca:ar-1:st-1".to_string());
        let with_qr = encode_receipt(&data, &config());
        data.qr_payload = None;
        let without_qr = encode_receipt(&data, &config());
        assert!(with_qr.len() > without_qr.len());
        let needle: &[u8] = b"mieadi:presenca:ar-1:st-1";
        assert!(with_qr.windows(needle.len()).any(|w| w == needle));
    }
}
