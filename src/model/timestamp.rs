use chrono::prelude::*;

// Unix timestamp in nanoseconds.
pub type Timestamp = u64;

pub trait TimestampTrait {
    fn now() -> Self;
    fn to_millis(&self) -> i64;
    fn to_secs_f64(&self) -> f64;
    fn to_rfc3339_nanos(&self) -> String;
}

impl TimestampTrait for Timestamp {
    fn now() -> Self {
        // Pre-epoch clocks and dates past 2262 don't fit into i64 nanoseconds.
        Utc::now()
            .timestamp_nanos_opt()
            .map(|ns| ns.max(0) as u64)
            .unwrap_or(0)
    }

    #[inline]
    fn to_millis(&self) -> i64 {
        (*self / 1_000_000) as i64
    }

    #[inline]
    fn to_secs_f64(&self) -> f64 {
        *self as f64 / 1_000_000_000.0
    }

    fn to_rfc3339_nanos(&self) -> String {
        let secs = (*self / 1_000_000_000) as i64;
        let nsecs = (*self % 1_000_000_000) as u32;
        match Utc.timestamp_opt(secs, nsecs).single() {
            Some(ts) => ts.format("%Y-%m-%dT%H:%M:%S%.9fZ").to_string(),
            None => format!("{}ns", self),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp_conversions() {
        let ts: Timestamp = 1_609_459_200_123_456_789;
        assert_eq!(ts.to_millis(), 1_609_459_200_123);
        assert!((ts.to_secs_f64() - 1_609_459_200.123_456_7).abs() < 1e-6);
        assert_eq!(ts.to_rfc3339_nanos(), "2021-01-01T00:00:00.123456789Z");
    }

    #[test]
    fn test_timestamp_now() {
        let ts = Timestamp::now();
        // 2021-01-01
        assert!(ts > 1_609_459_200_000_000_000);
    }
}
