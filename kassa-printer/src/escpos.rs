//! ESC/POS byte builder
//!
//! Chained calls append commands and text to one buffer, starting with
//! `ESC @`. Only the commands a receipt needs are covered.

use crate::directive::{Column, Directive, Font};
use crate::encoding::{Align, TextEncoding, display_width, encode_text, pad_width, truncate_width};

/// Receipt byte buffer
///
/// Text is kept as UTF-8 until [`EscPosBuilder::build`] re-encodes it for
/// the printer's code page.
pub struct EscPosBuilder {
    buf: Vec<u8>,
    width: usize,
}

impl EscPosBuilder {
    /// Builder for paper `width` characters wide (48 on 80mm rolls, 32 on 58mm)
    pub fn new(width: usize) -> Self {
        let mut buf = Vec::with_capacity(4096);
        // ESC @
        buf.extend_from_slice(&[0x1B, 0x40]);
        Self {
            buf,
            width: width.max(1),
        }
    }

    /// Append text without a line break
    pub fn text(&mut self, s: &str) -> &mut Self {
        self.buf.extend_from_slice(s.as_bytes());
        self
    }

    /// Append text and a line break
    pub fn line(&mut self, s: &str) -> &mut Self {
        self.text(s);
        self.buf.push(b'\n');
        self
    }

    /// Blank line
    pub fn newline(&mut self) -> &mut Self {
        self.buf.push(b'\n');
        self
    }

    /// Print the buffer and advance `lines` (ESC d n)
    pub fn feed(&mut self, lines: u8) -> &mut Self {
        self.buf.extend_from_slice(&[0x1B, 0x64, lines]);
        self
    }

    /// Justification for the following lines (ESC a n)
    pub fn align(&mut self, align: Align) -> &mut Self {
        let n = match align {
            Align::Left => 0x00,
            Align::Center => 0x01,
            Align::Right => 0x02,
        };
        self.buf.extend_from_slice(&[0x1B, 0x61, n]);
        self
    }

    pub fn center(&mut self) -> &mut Self {
        self.align(Align::Center)
    }

    /// Select character font (ESC M n)
    pub fn font(&mut self, font: Font) -> &mut Self {
        let n = match font {
            Font::A => 0x00,
            Font::B => 0x01,
        };
        self.buf.extend_from_slice(&[0x1B, 0x4D, n]);
        self
    }

    /// Toggle emphasized text (ESC E n)
    pub fn bold(&mut self, on: bool) -> &mut Self {
        self.buf.extend_from_slice(&[0x1B, 0x45, u8::from(on)]);
        self
    }

    /// Character magnification, 1..=8 in each direction (GS ! n)
    pub fn size(&mut self, width: u8, height: u8) -> &mut Self {
        let w = width.clamp(1, 8) - 1;
        let h = height.clamp(1, 8) - 1;
        self.buf.extend_from_slice(&[0x1D, 0x21, (w << 4) | h]);
        self
    }

    /// 2x2
    pub fn double_size(&mut self) -> &mut Self {
        self.size(2, 2)
    }

    pub fn reset_size(&mut self) -> &mut Self {
        self.size(1, 1)
    }

    /// Dashed rule across the paper
    pub fn sep_single(&mut self) -> &mut Self {
        self.line(&"-".repeat(self.width))
    }

    /// One table row
    ///
    /// Each column takes `floor(width * fraction)` characters. Text that does
    /// not fit continues on the next line inside the same column.
    pub fn row(&mut self, columns: &[Column]) -> &mut Self {
        let widths: Vec<usize> = columns
            .iter()
            .map(|c| ((self.width as f64 * c.width).floor() as usize).max(1))
            .collect();
        let mut pending: Vec<String> = columns.iter().map(|c| c.text.clone()).collect();

        loop {
            let mut line = String::new();
            let mut overflow = false;

            for ((column, &width), text) in columns.iter().zip(&widths).zip(pending.iter_mut()) {
                let mut head = truncate_width(text, width);
                if head.is_empty() {
                    // A glyph wider than the column still has to go somewhere
                    head = text.chars().take(1).collect();
                }
                let rest = text[head.len()..].to_string();

                if display_width(&head) > width {
                    line.push_str(&head);
                } else {
                    line.push_str(&pad_width(&head, width, column.align));
                }
                overflow |= !rest.is_empty();
                *text = rest;
            }

            self.line(&line);
            if !overflow {
                break;
            }
        }
        self
    }

    /// Full cut (GS V 0)
    pub fn cut(&mut self) -> &mut Self {
        self.buf.extend_from_slice(&[0x1D, 0x56, 0x00]);
        self
    }

    pub fn apply(&mut self, directive: &Directive) -> &mut Self {
        match directive {
            Directive::Font(font) => self.font(*font),
            Directive::Align(align) => self.align(*align),
            Directive::Bold(on) => self.bold(*on),
            Directive::Size { width, height } => self.size(*width, *height),
            Directive::Text(s) => self.line(s),
            Directive::BlankLine => self.newline(),
            Directive::Separator => self.sep_single(),
            Directive::Row(columns) => self.row(columns),
            Directive::Feed(lines) => self.feed(*lines),
            Directive::Cut => self.cut(),
        }
    }

    /// Finish, re-encoding text for the printer's code page
    pub fn build(self, encoding: TextEncoding) -> Vec<u8> {
        encode_text(&self.buf, encoding)
    }

    /// Finish without re-encoding
    pub fn build_raw(self) -> Vec<u8> {
        self.buf
    }
}

impl Default for EscPosBuilder {
    fn default() -> Self {
        Self::new(48)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn printed(b: EscPosBuilder) -> String {
        String::from_utf8_lossy(&b.build_raw()).into_owned()
    }

    #[test]
    fn test_builder_starts_with_init() {
        let data = EscPosBuilder::new(32).build_raw();
        assert_eq!(data, vec![0x1B, 0x40]);
    }

    #[test]
    fn test_style_commands() {
        let mut b = EscPosBuilder::default();
        b.center().bold(true).double_size().reset_size().bold(false);

        let data = b.build_raw();
        assert_eq!(
            &data[2..],
            &[
                0x1B, 0x61, 0x01, // center
                0x1B, 0x45, 0x01, // bold on
                0x1D, 0x21, 0x11, // 2x2
                0x1D, 0x21, 0x00, // 1x1
                0x1B, 0x45, 0x00, // bold off
            ]
        );
    }

    #[test]
    fn test_dashed_rule() {
        let mut b = EscPosBuilder::new(10);
        b.sep_single();
        assert!(printed(b).ends_with("----------\n"));
    }

    #[test]
    fn test_row_column_widths() {
        let mut b = EscPosBuilder::new(48);
        b.row(&[
            Column::new("Item", 0.4),
            Column::new("Qty", 0.2),
            Column::new("Price", 0.2),
            Column::new("Total", 0.2),
        ]);

        let s = printed(b);
        let line = s.trim_start_matches("\x1B\x40");
        assert_eq!(
            line,
            format!("{:<19}{:<9}{:<9}{:<9}\n", "Item", "Qty", "Price", "Total")
        );
    }

    #[test]
    fn test_row_overflow_wraps_inside_column() {
        let mut b = EscPosBuilder::new(10);
        b.row(&[Column::new("abcdefgh", 0.5), Column::new("xy", 0.5)]);

        let s = printed(b);
        let lines: Vec<&str> = s.trim_start_matches("\x1B\x40").lines().collect();
        assert_eq!(lines, vec!["abcdexy   ", "fgh       "]);
    }

    #[test]
    fn test_apply_cut() {
        let mut b = EscPosBuilder::new(48);
        b.apply(&Directive::Cut);
        assert!(b.build_raw().ends_with(&[0x1D, 0x56, 0x00]));
    }
}
