use chrono::{DateTime, Duration, Utc};

/// Returns a Discord timestamp in relative time format (R)
pub fn describe_relative(target: DateTime<Utc>) -> String {
    let timestamp = target.timestamp();
    format!("<t:{timestamp}:R>")
}

/// The moment `seconds` from now, for feeding Discord timestamps.
pub fn in_seconds(seconds: u32) -> DateTime<Utc> {
    Utc::now() + Duration::seconds(i64::from(seconds))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn relative_timestamps_use_discord_markup() {
        let target = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        assert_eq!(describe_relative(target), "<t:1700000000:R>");
    }
}
