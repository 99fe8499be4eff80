use core::fmt;

use time::OffsetDateTime;

/// Timestamp as a count of 100 ns ticks since 1601-01-01 00:00 UTC.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DateTime(i64);

impl DateTime {
    /// Earliest representable instant; encodes as 0.
    pub const MIN: Self = Self(0);
    /// Latest representable instant; encodes as `i64::MAX`.
    pub const MAX: Self = Self(i64::MAX);

    /// Ticks between 1601-01-01 and the Unix epoch.
    pub const UNIX_EPOCH_TICKS: i64 = 116_444_736_000_000_000;
    const TICKS_PER_SECOND: i64 = 10_000_000;

    pub const fn from_ticks(ticks: i64) -> Self {
        Self(ticks)
    }

    pub const fn ticks(self) -> i64 {
        self.0
    }

    pub fn from_unix_seconds(seconds: i64) -> Self {
        let ticks = seconds
            .saturating_mul(Self::TICKS_PER_SECOND)
            .saturating_add(Self::UNIX_EPOCH_TICKS);
        Self(ticks)
    }

    pub fn unix_seconds(self) -> i64 {
        self.0.saturating_sub(Self::UNIX_EPOCH_TICKS).div_euclid(Self::TICKS_PER_SECOND)
    }

    pub fn now() -> Self {
        Self::from(OffsetDateTime::now_utc())
    }

    /// Tick value as written on the wire, clamped to the representable range.
    pub fn wire_ticks(self) -> i64 {
        if self >= Self::MAX {
            i64::MAX
        } else if self <= Self::MIN {
            0
        } else {
            self.0
        }
    }
}

impl From<OffsetDateTime> for DateTime {
    fn from(value: OffsetDateTime) -> Self {
        let ticks = value.unix_timestamp_nanos() / 100 + i128::from(Self::UNIX_EPOCH_TICKS);
        let ticks = i64::try_from(ticks.max(0)).unwrap_or(i64::MAX);
        Self(ticks)
    }
}

impl fmt::Display for DateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let nanos = (i128::from(self.0) - i128::from(Self::UNIX_EPOCH_TICKS)) * 100;
        match OffsetDateTime::from_unix_timestamp_nanos(nanos) {
            Ok(instant) => write!(f, "{instant}"),
            Err(_) => write!(f, "{} ticks", self.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unix_epoch_conversion() {
        let epoch = DateTime::from(OffsetDateTime::UNIX_EPOCH);
        assert_eq!(epoch.ticks(), DateTime::UNIX_EPOCH_TICKS);
        assert_eq!(epoch.unix_seconds(), 0);
        assert_eq!(DateTime::from_unix_seconds(1).ticks(), DateTime::UNIX_EPOCH_TICKS + 10_000_000);
    }

    #[test]
    fn wire_ticks_clamp() {
        assert_eq!(DateTime::from_ticks(-5).wire_ticks(), 0);
        assert_eq!(DateTime::MAX.wire_ticks(), i64::MAX);
        assert_eq!(DateTime::from_ticks(42).wire_ticks(), 42);
    }
}
