//! Serial date conversion
//!
//! Worksheets store dates as numbers in the 1900 date system: serial 1 is
//! 1900-01-01 and serial 60 is the non-existent 1900-02-29 that Excel keeps
//! for Lotus compatibility. The fractional part is the time of day.

use chrono::{Duration, NaiveDate, NaiveDateTime};

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Convert a 1900-system serial number to a date and time
///
/// Returns `None` for negative or non-finite serials, for serial 60, and for
/// values beyond chrono's range.
///
/// ```
/// use sheet_stream_core::datetime::serial_to_datetime;
///
/// let dt = serial_to_datetime(45292.5).unwrap();
/// assert_eq!(dt.to_string(), "2024-01-01 12:00:00");
/// ```
pub fn serial_to_datetime(serial: f64) -> Option<NaiveDateTime> {
    if !serial.is_finite() || serial < 0.0 {
        return None;
    }

    let days = serial.trunc() as i64;
    if days == 60 {
        return None;
    }
    // Serials after the phantom leap day are shifted by one
    let adjusted = if days > 60 { days - 1 } else { days };

    let base = NaiveDate::from_ymd_opt(1899, 12, 31)?.and_hms_opt(0, 0, 0)?;
    let seconds = (serial.fract() * SECONDS_PER_DAY).round() as i64;

    base.checked_add_signed(Duration::days(adjusted))?
        .checked_add_signed(Duration::seconds(seconds))
}
