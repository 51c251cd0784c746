use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use kassa_printer::TextEncoding;

/// Which bus the printer is reached through
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PrinterTransport {
    /// First USB printer-class device
    #[default]
    Usb,
    /// Raw TCP printer at `PRINTER_ADDR`
    Network,
    /// In-process device, nothing is printed
    Memory,
}

impl FromStr for PrinterTransport {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "usb" => Ok(Self::Usb),
            "network" | "tcp" => Ok(Self::Network),
            "memory" => Ok(Self::Memory),
            other => Err(format!("unknown printer transport: {}", other)),
        }
    }
}

impl fmt::Display for PrinterTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Usb => "usb",
            Self::Network => "network",
            Self::Memory => "memory",
        };
        f.write_str(name)
    }
}

/// Server configuration
///
/// # Environment variables
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | PORT | 5058 | HTTP port |
/// | PRINTER_TRANSPORT | usb | usb, network or memory |
/// | PRINTER_ADDR | 127.0.0.1:9100 | network printer address |
/// | PRINTER_TIMEOUT_MS | 5000 | device I/O timeout |
/// | PAPER_WIDTH | 48 | characters per line |
/// | PRINTER_ENCODING | gb18030 | gb18030 or utf8 |
///
/// # Example
///
/// ```ignore
/// PORT=8080 PRINTER_TRANSPORT=memory cargo run
/// ```
///
/// Logging is set up before this is loaded; see
/// [`LogSettings`](crate::utils::logger::LogSettings).
#[derive(Debug, Clone)]
pub struct Config {
    pub http_port: u16,
    pub transport: PrinterTransport,
    pub printer_addr: String,
    pub printer_timeout_ms: u64,
    pub paper_width: usize,
    pub encoding: TextEncoding,
}

pub const DEFAULT_PORT: u16 = 5058;
pub const DEFAULT_PRINTER_ADDR: &str = "127.0.0.1:9100";
pub const DEFAULT_PRINTER_TIMEOUT_MS: u64 = 5000;
pub const DEFAULT_PAPER_WIDTH: usize = 48;

impl Config {
    /// Load configuration from the environment
    ///
    /// Missing variables take their defaults; unparseable ones are logged and
    /// take their defaults too.
    pub fn from_env() -> Self {
        Self {
            http_port: env_or("PORT", DEFAULT_PORT),
            transport: env_or("PRINTER_TRANSPORT", PrinterTransport::Usb),
            printer_addr: std::env::var("PRINTER_ADDR")
                .unwrap_or_else(|_| DEFAULT_PRINTER_ADDR.into()),
            printer_timeout_ms: env_or("PRINTER_TIMEOUT_MS", DEFAULT_PRINTER_TIMEOUT_MS),
            paper_width: env_or("PAPER_WIDTH", DEFAULT_PAPER_WIDTH).max(1),
            encoding: env_or("PRINTER_ENCODING", TextEncoding::Gb18030),
        }
    }

    /// Defaults with an in-memory printer
    ///
    /// Used by tests
    pub fn with_memory_printer() -> Self {
        Self {
            transport: PrinterTransport::Memory,
            ..Self::defaults()
        }
    }

    fn defaults() -> Self {
        Self {
            http_port: DEFAULT_PORT,
            transport: PrinterTransport::Usb,
            printer_addr: DEFAULT_PRINTER_ADDR.into(),
            printer_timeout_ms: DEFAULT_PRINTER_TIMEOUT_MS,
            paper_width: DEFAULT_PAPER_WIDTH,
            encoding: TextEncoding::Gb18030,
        }
    }

    pub fn printer_timeout(&self) -> Duration {
        Duration::from_millis(self.printer_timeout_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

fn env_or<T>(key: &str, default: T) -> T
where
    T: FromStr + fmt::Display,
    T::Err: fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => parse_or(key, &raw, default),
        Err(_) => default,
    }
}

fn parse_or<T>(key: &str, raw: &str, default: T) -> T
where
    T: FromStr + fmt::Display,
    T::Err: fmt::Display,
{
    match raw.trim().parse() {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(key, value = raw, error = %e, "Invalid setting, using {}", default);
            default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_names() {
        assert_eq!("usb".parse::<PrinterTransport>(), Ok(PrinterTransport::Usb));
        assert_eq!(" Network ".parse::<PrinterTransport>(), Ok(PrinterTransport::Network));
        assert_eq!("memory".parse::<PrinterTransport>(), Ok(PrinterTransport::Memory));
        assert!("bluetooth".parse::<PrinterTransport>().is_err());
    }

    #[test]
    fn test_bad_values_fall_back() {
        assert_eq!(parse_or("PORT", "80a", DEFAULT_PORT), 5058);
        assert_eq!(parse_or("PORT", "8080", DEFAULT_PORT), 8080);
        assert_eq!(
            parse_or("PRINTER_TRANSPORT", "serial", PrinterTransport::Usb),
            PrinterTransport::Usb
        );
        assert_eq!(
            parse_or("PRINTER_ENCODING", "utf-8", TextEncoding::Gb18030),
            TextEncoding::Utf8
        );
    }

    #[test]
    fn test_memory_printer_defaults() {
        let config = Config::with_memory_printer();
        assert_eq!(config.http_port, 5058);
        assert_eq!(config.paper_width, 48);
        assert_eq!(config.transport, PrinterTransport::Memory);
        assert_eq!(config.printer_timeout(), Duration::from_secs(5));
    }
}
