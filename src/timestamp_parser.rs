use anyhow::Result;
use chrono::NaiveDate;

const DATE_LEN: usize = 10;
const DATE_TIME_LEN: usize = 25;

/// Handles the two timestamp layouts accepted in usage files:
/// `YYYY-MM-DD` and `YYYY-MM-DDTHH:mm:ss±HH:mm`.
pub struct TimestampParser;

impl TimestampParser {
    /// Parse a timestamp and return the calendar date it was written on.
    /// Time and offset are checked by layout only; the offset is not applied.
    pub fn parse_date(timestamp_str: &str) -> Result<NaiveDate> {
        if !Self::has_accepted_shape(timestamp_str) {
            anyhow::bail!("Unrecognized timestamp layout: {}", timestamp_str);
        }

        NaiveDate::parse_from_str(&timestamp_str[..DATE_LEN], "%Y-%m-%d")
            .map_err(|e| anyhow::anyhow!("Failed to parse date of {}: {}", timestamp_str, e))
    }

    /// Digit-for-digit layout check, before any calendar validation.
    fn has_accepted_shape(s: &str) -> bool {
        let bytes = s.as_bytes();
        match bytes.len() {
            DATE_LEN => date_shape(bytes),
            DATE_TIME_LEN => {
                date_shape(bytes)
                    && bytes[10] == b'T'
                    && digits_at(bytes, &[11, 12, 14, 15, 17, 18, 20, 21, 23, 24])
                    && bytes[13] == b':'
                    && bytes[16] == b':'
                    && matches!(bytes[19], b'+' | b'-')
                    && bytes[22] == b':'
            }
            _ => false,
        }
    }
}

fn date_shape(bytes: &[u8]) -> bool {
    digits_at(bytes, &[0, 1, 2, 3, 5, 6, 8, 9]) && bytes[4] == b'-' && bytes[7] == b'-'
}

fn digits_at(bytes: &[u8], positions: &[usize]) -> bool {
    positions.iter().all(|&i| bytes[i].is_ascii_digit())
}
