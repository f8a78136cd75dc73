use std::time::{SystemTime, UNIX_EPOCH};

/// `HH:MM:SS`, UTC, matching the wire protocol in §6. The toolkit has no use
/// for sub-second precision or timezone handling, so this avoids pulling in a
/// full calendar/timezone crate for three integers.
pub fn now_hhmmss() -> String {
    let secs = SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_secs()).unwrap_or(0);
    let secs_of_day = secs % 86_400;
    format!("{:02}:{:02}:{:02}", secs_of_day / 3600, (secs_of_day % 3600) / 60, secs_of_day % 60)
}
