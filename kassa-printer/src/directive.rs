//! Print directives
//!
//! A directive is one formatting or content instruction for the printer.
//! Renderers produce a `Vec<Directive>`; [`encode`] turns it into ESC/POS
//! bytes. Keeping the two apart lets callers inspect a receipt without a
//! device attached.

use crate::encoding::{Align, TextEncoding};
use crate::escpos::EscPosBuilder;

/// Built-in printer fonts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Font {
    /// 12x24
    #[default]
    A,
    /// 9x17
    B,
}

/// One cell of a table row
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub text: String,
    /// Share of the paper width, 0.0..=1.0
    pub width: f64,
    pub align: Align,
}

impl Column {
    /// Left-aligned cell
    pub fn new(text: impl Into<String>, width: f64) -> Self {
        Self {
            text: text.into(),
            width,
            align: Align::Left,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Directive {
    Font(Font),
    Align(Align),
    Bold(bool),
    /// Character magnification (1 = normal)
    Size { width: u8, height: u8 },
    /// A line of text
    Text(String),
    BlankLine,
    /// Full-width dashed rule
    Separator,
    Row(Vec<Column>),
    Feed(u8),
    Cut,
}

/// Encode directives into printer bytes
pub fn encode(directives: &[Directive], width: usize, encoding: TextEncoding) -> Vec<u8> {
    let mut builder = EscPosBuilder::new(width);
    for directive in directives {
        builder.apply(directive);
    }
    builder.build(encoding)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_sequence() {
        let data = encode(
            &[
                Directive::Align(Align::Right),
                Directive::Text("Total: Rs.12.50".into()),
                Directive::Cut,
            ],
            48,
            TextEncoding::Gb18030,
        );

        let mut expected = vec![0x1B, 0x40, 0x1B, 0x61, 0x02];
        expected.extend_from_slice(b"Total: Rs.12.50\n");
        expected.extend_from_slice(&[0x1D, 0x56, 0x00]);
        assert_eq!(data, expected);
    }

    #[test]
    fn test_separator_uses_paper_width() {
        let data = encode(&[Directive::Separator], 32, TextEncoding::Utf8);
        let s = String::from_utf8(data).unwrap();
        assert!(s.ends_with(&format!("{}\n", "-".repeat(32))));
    }
}
