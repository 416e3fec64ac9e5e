pub type BridgeDateTime = hifitime::Epoch;

use hifitime::{UNIX_REF_EPOCH, Unit};

pub trait BridgeDateTimeExt {
    fn from_unix_milliseconds_i64(timestamp: i64) -> Self;
    fn from_unix_seconds_i64(timestamp: i64) -> Self;
    fn to_unix_milliseconds_i64(&self) -> i64;
    /// RFC3339 with an explicit `+00:00` offset, truncated to the second.
    fn to_rfc3339_utc(&self) -> String;
    /// `YYYY-MM-DD` in UTC.
    fn to_utc_date(&self) -> String;
}

impl BridgeDateTimeExt for BridgeDateTime {
    fn from_unix_milliseconds_i64(timestamp: i64) -> Self {
        Self::from_utc_duration(UNIX_REF_EPOCH.to_utc_duration() + timestamp * Unit::Millisecond)
    }
    fn from_unix_seconds_i64(timestamp: i64) -> Self {
        Self::from_utc_duration(UNIX_REF_EPOCH.to_utc_duration() + timestamp * Unit::Second)
    }
    fn to_unix_milliseconds_i64(&self) -> i64 {
        self.to_unix_milliseconds().round() as i64
    }
    fn to_rfc3339_utc(&self) -> String {
        let (year, month, day, hour, minute, second, _nanos) = self.to_gregorian_utc();
        format!(
            "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}+00:00",
            year, month, day, hour, minute, second
        )
    }
    fn to_utc_date(&self) -> String {
        let (year, month, day, ..) = self.to_gregorian_utc();
        format!("{:04}-{:02}-{:02}", year, month, day)
    }
}
