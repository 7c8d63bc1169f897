use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

const DAYS_IN_WEEK: i64 = 7;

/// Day of the week with a leading `Last` sentinel, so that `Sunday` has ordinal 1.
///
/// `Last` stands for "the last one" in recurrence rules and has no neighbours.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(rename_all = "UPPERCASE"))]
pub enum DayOfWeek {
    Last = 0,
    Sunday = 1,
    Monday = 2,
    Tuesday = 3,
    Wednesday = 4,
    Thursday = 5,
    Friday = 6,
    Saturday = 7,
}

impl DayOfWeek {
    pub const ALL: [DayOfWeek; 8] = [
        DayOfWeek::Last,
        DayOfWeek::Sunday,
        DayOfWeek::Monday,
        DayOfWeek::Tuesday,
        DayOfWeek::Wednesday,
        DayOfWeek::Thursday,
        DayOfWeek::Friday,
        DayOfWeek::Saturday,
    ];

    pub fn of(ordinal: u8) -> Option<Self> {
        Self::ALL.get(usize::from(ordinal)).copied()
    }

    pub fn ordinal(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            DayOfWeek::Last => "LAST",
            DayOfWeek::Sunday => "SUNDAY",
            DayOfWeek::Monday => "MONDAY",
            DayOfWeek::Tuesday => "TUESDAY",
            DayOfWeek::Wednesday => "WEDNESDAY",
            DayOfWeek::Thursday => "THURSDAY",
            DayOfWeek::Friday => "FRIDAY",
            DayOfWeek::Saturday => "SATURDAY",
        }
    }

    /// The day `count` days later, wrapping around the week. Negative counts go backwards.
    /// `Last` has no successor.
    pub fn next(self, count: i64) -> Option<Self> {
        if self == DayOfWeek::Last {
            return None;
        }
        let zero_based =
            (i64::from(self.ordinal()) - 1 + count.rem_euclid(DAYS_IN_WEEK)) % DAYS_IN_WEEK;
        Self::of(zero_based as u8 + 1)
    }

    /// The day `count` days earlier. `Last` has no predecessor.
    pub fn previous(self, count: i64) -> Option<Self> {
        self.next((-count.rem_euclid(DAYS_IN_WEEK)).rem_euclid(DAYS_IN_WEEK))
    }
}

impl fmt::Display for DayOfWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
