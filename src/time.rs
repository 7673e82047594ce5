use core::fmt;
use core::str::FromStr;
use log::{debug, trace};
use num::Integer;
use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;

/// Length of a single bookable slot, in minutes
pub const SLOT_MINUTES: u32 = 30;

const MINUTES_PER_HOUR: u32 = 60;
const MINUTES_PER_DAY: u32 = 24 * MINUTES_PER_HOUR;

#[derive(Error, Debug, Clone, Eq, PartialEq)]
pub enum TimeError {
    #[error("Expected a time like 9:30am, got {0:?}")]
    Malformed(String),
    #[error("Time out of range: hour {hour}, minute {minute}")]
    OutOfRange { hour: u32, minute: u32 },
}

/// A wall-clock time with minute precision.
/// Dates are never tracked, adding minutes wraps around midnight.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "String", into = "String")
)]
pub struct TimeOfDay {
    hour: u8,
    minute: u8,
}

impl TimeOfDay {
    /// Construct a new TimeOfDay from a 24-hour clock reading
    ///
    /// # Examples
    /// ```
    /// use appointment_libs::time::TimeOfDay;
    ///
    /// let time = TimeOfDay::new(13, 5).unwrap();
    /// assert_eq!(time.to_string(), "1:05pm");
    ///
    /// assert!(TimeOfDay::new(24, 0).is_err());
    /// ```
    pub fn new(hour: u32, minute: u32) -> Result<TimeOfDay, TimeError> {
        if hour < 24 && minute < MINUTES_PER_HOUR {
            Ok(TimeOfDay {
                hour: hour as u8,
                minute: minute as u8,
            })
        } else {
            Err(TimeError::OutOfRange { hour, minute })
        }
    }

    /// Builds a time from minutes past midnight, wrapping at 24 hours
    pub fn from_minutes(minutes: u32) -> TimeOfDay {
        let (hour, minute) = minutes.mod_floor(&MINUTES_PER_DAY).div_mod_floor(&MINUTES_PER_HOUR);
        TimeOfDay {
            hour: hour as u8,
            minute: minute as u8,
        }
    }

    /// Parses the `start_time` value handed over by the page.
    /// Anything that is not a valid `H:MMam|pm` time is treated as absent.
    ///
    /// # Examples
    /// ```
    /// use appointment_libs::time::TimeOfDay;
    ///
    /// assert_eq!(TimeOfDay::parse_start_time("12:00AM"), TimeOfDay::new(0, 0).ok());
    /// assert_eq!(TimeOfDay::parse_start_time("noon"), None);
    /// ```
    pub fn parse_start_time(value: &str) -> Option<TimeOfDay> {
        match value.parse() {
            Ok(time) => Some(time),
            Err(err) => {
                debug!("Ignoring start time: {}", err);
                None
            }
        }
    }

    pub fn hour(self) -> u32 {
        self.hour.into()
    }

    pub fn minute(self) -> u32 {
        self.minute.into()
    }

    /// Hour on a 12-hour clock, midnight and noon both read as 12
    pub fn hour12(self) -> u32 {
        match self.hour() % 12 {
            0 => 12,
            hour => hour,
        }
    }

    pub fn is_pm(self) -> bool {
        self.hour >= 12
    }

    pub fn minutes_since_midnight(self) -> u32 {
        self.hour() * MINUTES_PER_HOUR + self.minute()
    }

    /// Moves the time forward, wrapping past midnight
    ///
    /// # Examples
    /// ```
    /// use appointment_libs::time::TimeOfDay;
    ///
    /// let late = TimeOfDay::new(23, 45).unwrap();
    /// assert_eq!(late.add_minutes(30), TimeOfDay::new(0, 15).unwrap());
    /// ```
    pub fn add_minutes(self, minutes: u32) -> TimeOfDay {
        TimeOfDay::from_minutes(self.minutes_since_midnight() + minutes.mod_floor(&MINUTES_PER_DAY))
    }
}

fn start_time_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)^\s*(\d{1,2}):(\d{2})(am|pm)\s*$").expect("start time pattern compiles")
    })
}

impl FromStr for TimeOfDay {
    type Err = TimeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let captures = start_time_pattern()
            .captures(value)
            .ok_or_else(|| TimeError::Malformed(value.to_string()))?;

        let parse = |index: usize| -> Result<u32, TimeError> {
            captures[index]
                .parse()
                .map_err(|_| TimeError::Malformed(value.to_string()))
        };
        let mut hour = parse(1)?;
        let minute = parse(2)?;
        let pm = captures[3].eq_ignore_ascii_case("pm");

        if pm && hour != 12 {
            hour += 12;
        } else if !pm && hour == 12 {
            hour = 0;
        }

        TimeOfDay::new(hour, minute)
    }
}

impl TryFrom<String> for TimeOfDay {
    type Error = TimeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TimeOfDay> for String {
    fn from(time: TimeOfDay) -> Self {
        time.to_string()
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{:02}{}",
            self.hour12(),
            self.minute,
            if self.is_pm() { "pm" } else { "am" }
        )
    }
}

#[cfg(feature = "arbitrary")]
impl<'a> arbitrary::Arbitrary<'a> for TimeOfDay {
    fn arbitrary(u: &mut arbitrary::Unstructured<'a>) -> arbitrary::Result<Self> {
        let hour = u.int_in_range(0..=23u8)?;
        let minute = u.int_in_range(0..=59u8)?;
        Ok(TimeOfDay { hour, minute })
    }
}

/// Start times for `count` consecutive slots of the default length.
/// An absent base time yields no labels at all.
///
/// # Examples
/// ```
/// use appointment_libs::time::{label_slots, TimeOfDay};
///
/// let labels = label_slots(TimeOfDay::parse_start_time("9:00am"), 3)
///     .iter()
///     .map(ToString::to_string)
///     .collect::<Vec<_>>();
///
/// assert_eq!(labels, vec!["9:00am", "9:30am", "10:00am"]);
/// assert!(label_slots(None, 3).is_empty());
/// ```
pub fn label_slots(base: Option<TimeOfDay>, count: usize) -> Vec<TimeOfDay> {
    label_slots_every(base, count, SLOT_MINUTES)
}

/// Start times for `count` consecutive slots of `slot_minutes` each
pub fn label_slots_every(base: Option<TimeOfDay>, count: usize, slot_minutes: u32) -> Vec<TimeOfDay> {
    let base = match base {
        Some(base) => base,
        None => return vec![],
    };

    (0..count)
        .map(|index| {
            let offset = (index as u64 * u64::from(slot_minutes)).mod_floor(&u64::from(MINUTES_PER_DAY));
            let time = base.add_minutes(offset as u32);
            trace!("Slot {} starts at {}", index, time);
            time
        })
        .collect()
}
