use chrono::{DateTime, FixedOffset, TimeZone, Utc};

/// Get current Unix timestamp in JST (milliseconds)
pub fn get_jst_timestamp() -> i64 {
    let jst_offset = FixedOffset::east_opt(9 * 3600).unwrap(); // JST is UTC+9
    let now_utc = Utc::now();
    let now_jst: DateTime<FixedOffset> = now_utc.with_timezone(&jst_offset);
    now_jst.timestamp_millis()
}

/// Convert a Unix millisecond timestamp to an RFC 3339 string in JST
pub fn timestamp_to_jst_rfc3339(millis: i64) -> String {
    let jst_offset = FixedOffset::east_opt(9 * 3600).unwrap(); // JST is UTC+9
    Utc.timestamp_millis_opt(millis)
        .single()
        .map(|dt| dt.with_timezone(&jst_offset).to_rfc3339())
        .unwrap_or_default()
}
