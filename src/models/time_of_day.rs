use serde::{Serialize, Serializer};

pub const MINUTES_PER_DAY: u16 = 24 * 60;

/// Wall-clock time within a day, minute resolution. Written as `HH:MM`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeOfDay {
    minutes: u16,
}

impl TimeOfDay {
    /// Returns `None` outside 00:00..=23:59.
    pub fn from_hm(hour: u16, minute: u16) -> Option<Self> {
        if hour < 24 && minute < 60 {
            Some(Self { minutes: hour * 60 + minute })
        } else {
            None
        }
    }

    pub fn hour(self) -> u16 {
        self.minutes / 60
    }

    pub fn minute(self) -> u16 {
        self.minutes % 60
    }

    /// Shortest distance around the clock, so 23:30 and 00:15 are 45 minutes apart.
    pub fn circular_distance(self, other: TimeOfDay) -> u16 {
        let diff = self.minutes.abs_diff(other.minutes);
        diff.min(MINUTES_PER_DAY - diff)
    }
}

impl std::fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl Serialize for TimeOfDay {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_zero_padded() {
        assert_eq!(TimeOfDay::from_hm(6, 5).unwrap().to_string(), "06:05");
        assert_eq!(TimeOfDay::from_hm(23, 59).unwrap().to_string(), "23:59");
    }

    #[test]
    fn rejects_out_of_range() {
        assert!(TimeOfDay::from_hm(24, 0).is_none());
        assert!(TimeOfDay::from_hm(10, 60).is_none());
    }

    #[test]
    fn distance_wraps_midnight() {
        let late = TimeOfDay::from_hm(23, 30).unwrap();
        let early = TimeOfDay::from_hm(0, 15).unwrap();
        assert_eq!(late.circular_distance(early), 45);
        assert_eq!(early.circular_distance(late), 45);

        let a = TimeOfDay::from_hm(8, 0).unwrap();
        let b = TimeOfDay::from_hm(20, 0).unwrap();
        assert_eq!(a.circular_distance(b), 720);
    }
}
