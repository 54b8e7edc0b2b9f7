use chrono::{DateTime, Local};
use log::warn;

const TIMESTAMP_FORMAT: &str = "%d-%m-%Y %H:%M:%S";

/// A single timestamped line captured from the serial device.
#[derive(Debug, Clone)]
pub struct LogRecord {
    /// Local wall-clock time at the moment the line was read
    pub timestamp: DateTime<Local>,
    /// Line content with surrounding whitespace stripped
    pub message: String,
}

impl LogRecord {
    pub fn new(timestamp: DateTime<Local>, message: impl Into<String>) -> Self {
        Self {
            timestamp,
            message: message.into(),
        }
    }

    /// Build a record from raw serial bytes. A line that is not valid UTF-8
    /// produces a decode-error record instead of ending the session.
    pub fn from_raw(timestamp: DateTime<Local>, raw: &[u8]) -> Self {
        match std::str::from_utf8(raw) {
            Ok(text) => Self::new(timestamp, text.trim()),
            Err(e) => {
                warn!("Received line that is not valid UTF-8: {}", e);
                Self::new(
                    timestamp,
                    format!("<decode error: invalid utf-8 after {} bytes>", e.valid_up_to()),
                )
            }
        }
    }

    pub fn render(&self) -> String {
        format!("{} - {}", self.timestamp.format(TIMESTAMP_FORMAT), self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_timestamp() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap()
    }

    #[test]
    fn renders_day_month_year_timestamp() {
        let record = LogRecord::new(fixed_timestamp(), "lockstep mismatch");
        assert_eq!(record.render(), "02-01-2024 03:04:05 - lockstep mismatch");
    }

    #[test]
    fn strips_trailing_carriage_return_and_newline() {
        let record = LogRecord::from_raw(fixed_timestamp(), b"temp=42\r\n");
        assert_eq!(record.render(), "02-01-2024 03:04:05 - temp=42");
    }

    #[test]
    fn strips_surrounding_whitespace() {
        let record = LogRecord::from_raw(fixed_timestamp(), b"  bitflip at 0x0800\t\n");
        assert_eq!(record.message, "bitflip at 0x0800");
    }

    #[test]
    fn invalid_utf8_becomes_decode_error_record() {
        let record = LogRecord::from_raw(fixed_timestamp(), b"temp=\xff42\n");
        assert_eq!(record.message, "<decode error: invalid utf-8 after 5 bytes>");
    }
}
