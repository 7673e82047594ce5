use crate::time::SLOT_MINUTES;
use log::{debug, trace};
use regex::Regex;
use std::num::IntErrorKind;
use std::sync::OnceLock;
use thiserror::Error;

/// The only purpose whose bookings must cover their badge time
pub const CHECKOUT_PURPOSE: &str = "checkout";

/// Prompt raised when a submission is cancelled for lack of coverage
pub const SUBMIT_PROMPT: &str =
    "Please select enough time slots to cover the total required time for the selected badges.";

#[derive(Error, Debug, Clone, Copy, Eq, PartialEq)]
pub enum CoverageError {
    #[error("Please select enough slots ({covered_minutes} min) to cover the required badge time of {required_minutes} minutes.")]
    InsufficientSlots {
        covered_minutes: u32,
        required_minutes: u32,
    },
}

fn digits_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\d+").expect("digits pattern compiles"))
}

/// Minutes a badge requires, read from the first number in its label.
/// Labels without a number require nothing, numbers too large for `u32` saturate.
///
/// # Examples
/// ```
/// use appointment_libs::coverage::badge_minutes;
///
/// assert_eq!(badge_minutes("Laser cutter (45 minutes), level 2"), 45);
/// assert_eq!(badge_minutes("No checkout needed"), 0);
/// assert_eq!(badge_minutes("4294967296 minutes"), u32::MAX);
/// ```
pub fn badge_minutes(label: &str) -> u32 {
    match digits_pattern().find(label) {
        Some(found) => match found.as_str().parse::<u32>() {
            Ok(minutes) => minutes,
            Err(err) if *err.kind() == IntErrorKind::PosOverflow => {
                debug!("Badge minutes in {:?} saturate at {}", label, u32::MAX);
                u32::MAX
            }
            Err(err) => {
                debug!("Unreadable badge minutes in {:?}: {}", label, err);
                0
            }
        },
        None => {
            trace!("No badge minutes in {:?}", label);
            0
        }
    }
}

/// Which purpose turns the coverage check on, and how long a slot lasts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverageRule {
    trigger_purpose: String,
    slot_minutes: u32,
}

impl Default for CoverageRule {
    fn default() -> Self {
        CoverageRule::new(CHECKOUT_PURPOSE, SLOT_MINUTES)
    }
}

impl CoverageRule {
    pub fn new(trigger_purpose: &str, slot_minutes: u32) -> CoverageRule {
        CoverageRule {
            trigger_purpose: trigger_purpose.to_string(),
            slot_minutes,
        }
    }

    pub fn trigger_purpose(&self) -> &str {
        &self.trigger_purpose
    }

    pub fn slot_minutes(&self) -> u32 {
        self.slot_minutes
    }

    pub fn applies_to(&self, purpose: Option<&str>) -> bool {
        purpose == Some(self.trigger_purpose.as_str())
    }

    /// Compares the time booked against the time the selected badges require.
    /// Only enforced for the trigger purpose, any other purpose is always satisfied.
    pub fn check<I>(&self, purpose: Option<&str>, badge_minutes: I, selected_slot_count: usize) -> Coverage
    where
        I: IntoIterator<Item = u32>,
    {
        let required_minutes = badge_minutes
            .into_iter()
            .fold(0u32, |total, minutes| total.saturating_add(minutes));
        let covered_minutes = u32::try_from(selected_slot_count)
            .unwrap_or(u32::MAX)
            .saturating_mul(self.slot_minutes);
        let enforced = self.applies_to(purpose);

        Coverage {
            enforced,
            required_minutes,
            covered_minutes,
            selected_slot_count,
            satisfied: !enforced || covered_minutes >= required_minutes,
        }
    }
}

/// Outcome of a single coverage check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize),
    serde(rename_all = "camelCase")
)]
pub struct Coverage {
    pub enforced: bool,
    pub required_minutes: u32,
    pub covered_minutes: u32,
    pub selected_slot_count: usize,
    pub satisfied: bool,
}

impl Coverage {
    /// Inline text for the form, empty when nothing is missing
    pub fn message(&self) -> String {
        match self.ensure() {
            Ok(()) => String::new(),
            Err(err) => err.to_string(),
        }
    }

    pub fn ensure(&self) -> Result<(), CoverageError> {
        if self.satisfied {
            Ok(())
        } else {
            Err(CoverageError::InsufficientSlots {
                covered_minutes: self.covered_minutes,
                required_minutes: self.required_minutes,
            })
        }
    }
}

/// Coverage check with the default rule: `checkout` bookings, 30 minute slots
///
/// # Examples
/// ```
/// use appointment_libs::coverage::check_coverage;
///
/// let coverage = check_coverage(Some("checkout"), vec![30, 45], 2);
/// assert_eq!(coverage.required_minutes, 75);
/// assert_eq!(coverage.covered_minutes, 60);
/// assert!(!coverage.satisfied);
///
/// assert!(check_coverage(Some("training"), vec![1000], 0).satisfied);
/// ```
pub fn check_coverage<I>(purpose: Option<&str>, badge_minutes: I, selected_slot_count: usize) -> Coverage
where
    I: IntoIterator<Item = u32>,
{
    CoverageRule::default().check(purpose, badge_minutes, selected_slot_count)
}
