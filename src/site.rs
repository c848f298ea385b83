use chrono::FixedOffset;

pub const SITE_NAME: &str = "Desa Petir, Dramaga, Bogor";
pub const LATITUDE: f64 = -6.612778;
pub const LONGITUDE: f64 = 106.725833;

/// Western Indonesia Time (WIB), UTC+07:00. No daylight saving.
const UTC_OFFSET_SECONDS: i32 = 7 * 3600;

pub fn utc_offset() -> FixedOffset {
    match FixedOffset::east_opt(UTC_OFFSET_SECONDS) {
        Some(offset) => offset,
        None => unreachable!("site offset is within one day"),
    }
}
