//! TLE epoch parsing

use chrono::{DateTime, Duration, NaiveDate, Utc};

/// Parse TLE epoch from line 1 to UTC DateTime
///
/// The epoch occupies columns 19-32 (1-based) as `YYDDD.FFFFFFFF`: two-digit
/// year, day of year, and fractional day. Years 57-99 map to 19xx, the rest
/// to 20xx.
pub fn parse_tle_epoch_to_utc(line1: &str) -> Option<DateTime<Utc>> {
    if line1.len() < 32 {
        return None;
    }
    let field = line1[18..32].trim();
    let (yyddd, frac) = match field.split_once('.') {
        Some((whole, frac)) => (whole, frac),
        None => (field, "0"),
    };
    if yyddd.len() < 3 {
        return None;
    }

    let (yy_str, ddd_str) = yyddd.split_at(2);
    let yy: i32 = yy_str.parse().ok()?;
    let ddd: i64 = ddd_str.parse().ok()?;
    let year = if yy >= 57 { 1900 + yy } else { 2000 + yy };

    let jan1 = NaiveDate::from_ymd_opt(year, 1, 1)?;
    let date = jan1.checked_add_signed(Duration::days(ddd - 1))?;

    let day_fraction: f64 = format!("0.{frac}").parse().ok()?;
    let frac_sec = day_fraction * 86400.0;
    let secs = frac_sec.trunc() as i64;
    let nanos = ((frac_sec - frac_sec.trunc()) * 1e9).round() as i64;

    let midnight = date.and_hms_opt(0, 0, 0)?;
    let ndt = midnight + Duration::seconds(secs) + Duration::nanoseconds(nanos);
    Some(DateTime::<Utc>::from_naive_utc_and_offset(ndt, Utc))
}
