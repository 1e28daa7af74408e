//! ESC/POS command builder
//!
//! Provides a fluent API for building ESC/POS print data.

use crate::config::{CharacterEncoding, CutType};
use crate::encoding::{column_width, encode_text};

/// ESC/POS command builder
///
/// Builds ESC/POS byte sequences for thermal printers. Text is converted
/// to the configured encoding as it is appended, so command bytes are
/// never touched by the text conversion.
pub struct EscPosBuilder {
    buf: Vec<u8>,
    width: usize,
    encoding: CharacterEncoding,
}

impl EscPosBuilder {
    /// Create a new builder with the specified paper width in characters
    ///
    /// Common widths:
    /// - 58mm paper: 32 characters
    /// - 80mm paper: 48 characters
    pub fn new(width: usize, encoding: CharacterEncoding) -> Self {
        let mut buf = Vec::with_capacity(4096);
        // Initialize printer (ESC @)
        buf.extend_from_slice(&[0x1B, 0x40]);
        Self {
            buf,
            width,
            encoding,
        }
    }

    /// Get the configured paper width
    pub fn width(&self) -> usize {
        self.width
    }

    // === Text Output ===

    /// Write raw text in the configured encoding
    pub fn text(&mut self, s: &str) -> &mut Self {
        let bytes = encode_text(s, self.encoding);
        self.buf.extend_from_slice(&bytes);
        self
    }

    /// Write text followed by newline
    pub fn line(&mut self, s: &str) -> &mut Self {
        self.text(s);
        self.buf.push(b'\n');
        self
    }

    /// Write empty line
    pub fn newline(&mut self) -> &mut Self {
        self.buf.push(b'\n');
        self
    }

    /// Print and feed n lines (ESC d n)
    pub fn feed(&mut self, lines: u8) -> &mut Self {
        self.buf.extend_from_slice(&[0x1B, 0x64, lines]);
        self
    }

    // === Alignment ===

    /// Align text to center
    pub fn center(&mut self) -> &mut Self {
        self.buf.extend_from_slice(&[0x1B, 0x61, 0x01]);
        self
    }

    /// Align text to left (default)
    pub fn left(&mut self) -> &mut Self {
        self.buf.extend_from_slice(&[0x1B, 0x61, 0x00]);
        self
    }

    /// Align text to right
    pub fn right(&mut self) -> &mut Self {
        self.buf.extend_from_slice(&[0x1B, 0x61, 0x02]);
        self
    }

    // === Text Style ===

    /// Enable bold text
    pub fn bold(&mut self) -> &mut Self {
        self.buf.extend_from_slice(&[0x1B, 0x45, 0x01]);
        self
    }

    /// Disable bold text
    pub fn bold_off(&mut self) -> &mut Self {
        self.buf.extend_from_slice(&[0x1B, 0x45, 0x00]);
        self
    }

    /// Double width and height
    pub fn double_size(&mut self) -> &mut Self {
        self.buf.extend_from_slice(&[0x1D, 0x21, 0x11]);
        self
    }

    /// Double height only
    pub fn double_height(&mut self) -> &mut Self {
        self.buf.extend_from_slice(&[0x1D, 0x21, 0x01]);
        self
    }

    /// Reset to normal size
    pub fn reset_size(&mut self) -> &mut Self {
        self.buf.extend_from_slice(&[0x1D, 0x21, 0x00]);
        self
    }

    // === Separators ===

    /// Print a line of '=' characters
    pub fn sep_double(&mut self) -> &mut Self {
        self.line(&"=".repeat(self.width))
    }

    /// Print a line of '-' characters
    pub fn sep_single(&mut self) -> &mut Self {
        self.line(&"-".repeat(self.width))
    }

    // === Layout Helpers ===

    /// Print left and right text on the same line
    ///
    /// Left text is left-aligned, right text is right-aligned,
    /// with spaces filling the gap.
    pub fn line_lr(&mut self, left: &str, right: &str) -> &mut Self {
        let lw = column_width(left);
        let rw = column_width(right);

        if lw + rw >= self.width {
            // Too long, just print with space
            self.text(left);
            self.text(" ");
            self.line(right);
        } else {
            let spaces = self.width - lw - rw;
            self.text(left);
            self.text(&" ".repeat(spaces));
            self.line(right);
        }
        self
    }

    // === Paper Control ===

    /// Cut paper per the configured cut type
    ///
    /// GS V 0x00 for a full cut, GS V 0x01 for a partial cut. With
    /// `CutType::None` the cut command is omitted entirely.
    pub fn cut(&mut self, cut_type: CutType) -> &mut Self {
        match cut_type {
            CutType::Full => self.buf.extend_from_slice(&[0x1D, 0x56, 0x00]),
            CutType::Partial => self.buf.extend_from_slice(&[0x1D, 0x56, 0x01]),
            CutType::None => {}
        }
        self
    }

    // === QR Code ===

    /// Print a QR code
    ///
    /// Size: 1-16 (module size in dots)
    pub fn qr_code(&mut self, data: &str, size: u8) -> &mut Self {
        let size = size.clamp(1, 16);

        // Function 165: Select model (Model 2)
        self.buf
            .extend_from_slice(&[0x1D, 0x28, 0x6B, 0x04, 0x00, 0x31, 0x41, 0x31, 0x00]);

        // Function 167: Set module size
        self.buf
            .extend_from_slice(&[0x1D, 0x28, 0x6B, 0x03, 0x00, 0x31, 0x43, size]);

        // Function 169: Set error correction (L)
        self.buf
            .extend_from_slice(&[0x1D, 0x28, 0x6B, 0x03, 0x00, 0x31, 0x45, 0x31]);

        // Function 180: Store data
        let data_bytes = data.as_bytes();
        let len = data_bytes.len() + 3;
        let p_l = (len & 0xFF) as u8;
        let p_h = ((len >> 8) & 0xFF) as u8;
        self.buf
            .extend_from_slice(&[0x1D, 0x28, 0x6B, p_l, p_h, 0x31, 0x50, 0x30]);
        self.buf.extend_from_slice(data_bytes);

        // Function 181: Print
        self.buf
            .extend_from_slice(&[0x1D, 0x28, 0x6B, 0x03, 0x00, 0x31, 0x51, 0x30]);

        self
    }

    // === Raw Commands ===

    /// Write raw bytes directly
    pub fn raw(&mut self, bytes: &[u8]) -> &mut Self {
        self.buf.extend_from_slice(bytes);
        self
    }

    /// Reset printer to default state
    pub fn reset(&mut self) -> &mut Self {
        self.buf.extend_from_slice(&[0x1B, 0x40]);
        self
    }

    // === Build ===

    /// Build the final byte buffer
    pub fn build(self) -> Vec<u8> {
        self.buf
    }
}

impl Default for EscPosBuilder {
    fn default() -> Self {
        Self::new(48, CharacterEncoding::Utf8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_basic() {
        let mut b = EscPosBuilder::new(32, CharacterEncoding::Utf8);
        b.center()
            .double_size()
            .line("COMPROVANTE")
            .reset_size()
            .left()
            .line("Aluno: Maria");

        let data = b.build();
        // Starts with initialize (ESC @)
        assert_eq!(&data[..2], &[0x1B, 0x40]);
        let s = String::from_utf8_lossy(&data);
        assert!(s.contains("COMPROVANTE"));
        assert!(s.contains("Aluno: Maria"));
    }

    #[test]
    fn test_line_lr() {
        let mut b = EscPosBuilder::new(20, CharacterEncoding::Utf8);
        b.line_lr("Data", "10/08");

        let data = b.build();
        let s = String::from_utf8_lossy(&data);
        assert!(s.contains("Data"));
        assert!(s.contains("10/08"));
    }

    #[test]
    fn test_separators() {
        let mut b = EscPosBuilder::new(10, CharacterEncoding::Utf8);
        b.sep_double();

        let data = b.build();
        let s = String::from_utf8_lossy(&data);
        assert!(s.contains("=========="));
    }

    #[test]
    fn test_cut_variants() {
        let mut full = EscPosBuilder::new(32, CharacterEncoding::Utf8);
        full.cut(CutType::Full);
        assert!(full.build().ends_with(&[0x1D, 0x56, 0x00]));

        let mut partial = EscPosBuilder::new(32, CharacterEncoding::Utf8);
        partial.cut(CutType::Partial);
        assert!(partial.build().ends_with(&[0x1D, 0x56, 0x01]));

        let mut none = EscPosBuilder::new(32, CharacterEncoding::Utf8);
        none.cut(CutType::None);
        // No cut command appended, only the init sequence remains
        assert_eq!(none.build(), vec![0x1B, 0x40]);
    }

    #[test]
    fn test_qr_length_prefix() {
        let payload = "recibo:1234";
        let mut b = EscPosBuilder::new(32, CharacterEncoding::Utf8);
        b.qr_code(payload, 6);
        let data = b.build();

        // Store-data header carries payload length + 3 as little-endian u16
        let expected = (payload.len() + 3) as u8;
        let pos = data
            .windows(4)
            .position(|w| w == [0x1D, 0x28, 0x6B, expected])
            .expect("store command present");
        assert_eq!(data[pos + 4], 0x00); // p_h
        assert!(data[pos..].len() > payload.len());
    }

    #[test]
    fn test_latin1_text_bytes() {
        let mut b = EscPosBuilder::new(32, CharacterEncoding::Latin1);
        b.line("Presença");
        let data = b.build();
        // ç encodes to a single 0xE7 byte
        assert!(data.contains(&0xE7));
    }
}
