//! Text encoding and column-width utilities
//!
//! Thermal printers address text in columns of a fixed-width font. CJK glyphs
//! take two columns, everything else one. Output bytes are produced by:
//! - Passing ASCII (0x00-0x7F) through untouched, so ESC/POS commands survive
//! - Re-encoding non-ASCII runs into the printer's code page

use std::fmt;
use std::str::FromStr;

use crate::error::PrintError;

/// Code page the printer expects for non-ASCII text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextEncoding {
    /// GB18030, the factory default of most ESC/POS thermal printers
    #[default]
    Gb18030,
    /// Send UTF-8 as-is (printers with a UTF-8 code page)
    Utf8,
}

impl FromStr for TextEncoding {
    type Err = PrintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gb18030" | "gbk" => Ok(Self::Gb18030),
            "utf8" | "utf-8" => Ok(Self::Utf8),
            other => Err(PrintError::InvalidConfig(format!(
                "Unknown text encoding: {}",
                other
            ))),
        }
    }
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gb18030 => f.write_str("gb18030"),
            Self::Utf8 => f.write_str("utf8"),
        }
    }
}

/// Column alignment inside a fixed width
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

/// Columns occupied by a single character
fn char_width(c: char) -> usize {
    if c.is_ascii() { 1 } else { 2 }
}

/// Columns occupied by a string
pub fn display_width(s: &str) -> usize {
    s.chars().map(char_width).sum()
}

/// Keep at most `max` characters
pub fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

/// Truncate a string to fit within a display width
pub fn truncate_width(s: &str, max_width: usize) -> String {
    let mut width = 0;
    let mut result = String::new();
    for c in s.chars() {
        let w = char_width(c);
        if width + w > max_width {
            break;
        }
        result.push(c);
        width += w;
    }
    result
}

/// Pad a string to a specific display width
///
/// If the string is longer than the width, it will be truncated.
pub fn pad_width(s: &str, width: usize, align: Align) -> String {
    let current = display_width(s);
    if current >= width {
        return truncate_width(s, width);
    }
    let spaces = width - current;
    match align {
        Align::Left => format!("{}{}", s, " ".repeat(spaces)),
        Align::Right => format!("{}{}", " ".repeat(spaces), s),
        Align::Center => {
            let before = spaces / 2;
            format!("{}{}{}", " ".repeat(before), s, " ".repeat(spaces - before))
        }
    }
}

/// Convert a mixed buffer (ESC/POS commands + UTF-8 text) to printer bytes
///
/// For GB18030, every non-ASCII run is wrapped in FS & / FS . so the printer
/// switches to double-byte mode only where it is needed.
pub fn encode_text(bytes: &[u8], encoding: TextEncoding) -> Vec<u8> {
    if encoding == TextEncoding::Utf8 {
        return bytes.to_vec();
    }

    let mut result = Vec::with_capacity(bytes.len() + bytes.len() / 2);
    let mut run = Vec::new();

    for &b in bytes {
        if b < 0x80 {
            flush_run(&mut run, &mut result);
            result.push(b);
        } else {
            run.push(b);
        }
    }
    flush_run(&mut run, &mut result);

    result
}

fn flush_run(run: &mut Vec<u8>, result: &mut Vec<u8>) {
    if run.is_empty() {
        return;
    }

    let text = String::from_utf8_lossy(run);
    let (encoded, _, _) = encoding_rs::GB18030.encode(&text);

    // FS & - enter Kanji/Chinese mode
    result.extend_from_slice(&[0x1C, 0x26]);
    result.extend_from_slice(&encoded);
    // FS . - leave Kanji/Chinese mode
    result.extend_from_slice(&[0x1C, 0x2E]);

    run.clear();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_width() {
        assert_eq!(display_width("hello"), 5);
        assert_eq!(display_width("你好"), 4);
        assert_eq!(display_width("AB中文CD"), 8);
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate_chars("Chicken Biryani Family Pack", 20), "Chicken Biryani Fami");
        assert_eq!(truncate_chars("naan", 20), "naan");
        assert_eq!(truncate_width("你好世界", 5), "你好");
        assert_eq!(truncate_width("AB中文", 4), "AB中");
    }

    #[test]
    fn test_pad_width() {
        assert_eq!(pad_width("hi", 5, Align::Left), "hi   ");
        assert_eq!(pad_width("hi", 5, Align::Right), "   hi");
        assert_eq!(pad_width("hi", 6, Align::Center), "  hi  ");
        assert_eq!(pad_width("hello world", 5, Align::Left), "hello");
    }

    #[test]
    fn test_encode_ascii_untouched() {
        let input = b"\x1B\x40Total: Rs.10.00\n";
        assert_eq!(encode_text(input, TextEncoding::Gb18030), input.to_vec());
    }

    #[test]
    fn test_encode_wraps_non_ascii_runs() {
        let out = encode_text("A中B".as_bytes(), TextEncoding::Gb18030);
        assert_eq!(out, vec![b'A', 0x1C, 0x26, 0xD6, 0xD0, 0x1C, 0x2E, b'B']);
    }

    #[test]
    fn test_encode_utf8_passthrough() {
        let input = "Café".as_bytes();
        assert_eq!(encode_text(input, TextEncoding::Utf8), input.to_vec());
    }

    #[test]
    fn test_parse_encoding() {
        assert_eq!("GB18030".parse::<TextEncoding>().unwrap(), TextEncoding::Gb18030);
        assert_eq!("utf-8".parse::<TextEncoding>().unwrap(), TextEncoding::Utf8);
        assert!("latin1".parse::<TextEncoding>().is_err());
    }
}
