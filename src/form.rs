//! The appointment add form as plain state.
//!
//! The page reads its fields into a [`FormState`], attaches an [`AppointmentForm`]
//! and forwards every change event to it. After each call the page renders what
//! the form exposes: slot labels, disabled slots, the reserved notice and the
//! coverage message. Each of those is held once per form and only ever updated,
//! so re-running a handler never produces a second copy.

use crate::availability::{compute_unavailable, Availability, ReservationRecord};
use crate::config::FormConfig;
use crate::coverage::{badge_minutes, Coverage, CoverageError, CoverageRule, SUBMIT_PROMPT};
use crate::query;
use crate::time::label_slots_every;
use log::{debug, info, trace};
use std::collections::BTreeSet;
use thiserror::Error;

#[derive(Error, Debug, Clone, Eq, PartialEq)]
pub enum FormError {
    #[error("No slot with key {0:?} on this form")]
    UnknownSlot(String),
    #[error("No badge at position {0} on this form")]
    UnknownBadge(usize),
    #[error("Slot {0:?} is already reserved for the selected date")]
    SlotUnavailable(String),
}

/// Raised when a submission has to be cancelled
#[derive(Error, Debug, Clone, Copy, Eq, PartialEq)]
#[error("Submission cancelled: {reason}")]
pub struct SubmitBlocked {
    #[source]
    pub reason: CoverageError,
}

impl SubmitBlocked {
    /// Attention prompt for the user, the inline message carries the numbers
    pub fn prompt(&self) -> &'static str {
        SUBMIT_PROMPT
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize),
    serde(default, rename_all = "camelCase")
)]
pub struct SlotInput {
    pub key: String,
    pub checked: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize),
    serde(default, rename_all = "camelCase")
)]
pub struct BadgeInput {
    pub label: String,
    pub checked: bool,
}

/// Field values as the page reads them on attach
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize),
    serde(default, rename_all = "camelCase")
)]
pub struct FormState {
    pub purpose: Option<String>,
    pub date: Option<String>,
    pub slots: Vec<SlotInput>,
    pub badges: Vec<BadgeInput>,
    pub reservations: Vec<ReservationRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize),
    serde(rename_all = "camelCase")
)]
pub struct SlotOption {
    key: String,
    checked: bool,
    disabled: bool,
    time_label: Option<String>,
}

impl SlotOption {
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn checked(&self) -> bool {
        self.checked
    }

    pub fn disabled(&self) -> bool {
        self.disabled
    }

    /// The computed start time, rendered as `(9:30am)` next to the option
    pub fn time_label(&self) -> Option<&str> {
        self.time_label.as_deref()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize),
    serde(rename_all = "camelCase")
)]
pub struct BadgeOption {
    label: String,
    minutes: u32,
    checked: bool,
}

impl BadgeOption {
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn minutes(&self) -> u32 {
        self.minutes
    }

    pub fn checked(&self) -> bool {
        self.checked
    }
}

#[derive(Debug, Clone)]
pub struct AppointmentForm {
    rule: CoverageRule,
    purpose: Option<String>,
    date: Option<String>,
    slots: Vec<SlotOption>,
    badges: Vec<BadgeOption>,
    reservations: Vec<ReservationRecord>,
    availability: Availability,
    reserved_notice: Option<&'static str>,
    coverage_message: Option<String>,
}

impl AppointmentForm {
    /// Takes over a freshly rendered form: labels the slots from the page's
    /// query string, disables reserved slots and runs the first coverage check.
    pub fn attach(config: &FormConfig, state: FormState, page_query: &str) -> AppointmentForm {
        let mut form = AppointmentForm {
            rule: config.coverage_rule(),
            purpose: state.purpose,
            date: state.date,
            slots: state
                .slots
                .into_iter()
                .map(|slot| SlotOption {
                    key: slot.key.trim().to_string(),
                    checked: slot.checked,
                    disabled: false,
                    time_label: None,
                })
                .collect(),
            badges: state
                .badges
                .into_iter()
                .map(|badge| BadgeOption {
                    minutes: badge_minutes(&badge.label),
                    label: badge.label,
                    checked: badge.checked,
                })
                .collect(),
            reservations: state.reservations,
            availability: Availability::default(),
            reserved_notice: None,
            coverage_message: None,
        };

        info!(
            slots = form.slots.len(),
            badges = form.badges.len(),
            reservations = form.reservations.len();
            "Attaching appointment form"
        );

        form.relabel(page_query);
        form.refresh_availability();
        form.check_coverage();
        form
    }

    pub fn slots(&self) -> &[SlotOption] {
        &self.slots
    }

    pub fn badges(&self) -> &[BadgeOption] {
        &self.badges
    }

    pub fn purpose(&self) -> Option<&str> {
        self.purpose.as_deref()
    }

    pub fn date(&self) -> Option<&str> {
        self.date.as_deref()
    }

    pub fn availability(&self) -> &Availability {
        &self.availability
    }

    /// "All time slots are reserved" advisory, present while every slot is taken
    pub fn reserved_notice(&self) -> Option<&'static str> {
        self.reserved_notice
    }

    /// The coverage message element: absent unless the purpose is checked,
    /// empty while the selected slots are enough.
    pub fn coverage_message(&self) -> Option<&str> {
        self.coverage_message.as_deref()
    }

    /// Labels every slot that has no label yet and returns how many were added.
    /// Slots that already carry a label keep it.
    pub fn relabel(&mut self, page_query: &str) -> usize {
        let labels = label_slots_every(
            query::start_time(page_query),
            self.slots.len(),
            self.rule.slot_minutes(),
        );

        let mut added = 0;
        for (slot, time) in self.slots.iter_mut().zip(labels) {
            if slot.time_label.is_none() {
                slot.time_label = Some(format!("({})", time));
                added += 1;
            } else {
                trace!("Slot {} already labeled", slot.key);
            }
        }
        added
    }

    /// Disables every slot reserved on the selected date and re-enables the rest.
    /// A checked slot that turns out to be reserved is unchecked.
    pub fn refresh_availability(&mut self) -> &Availability {
        let keys: BTreeSet<String> = self.slots.iter().map(|slot| slot.key.clone()).collect();
        self.availability = compute_unavailable(self.date.as_deref(), &self.reservations, &keys);

        for slot in self.slots.iter_mut() {
            slot.disabled = self.availability.is_unavailable(&slot.key);
            if slot.disabled && slot.checked {
                debug!("Unchecking reserved slot {}", slot.key);
                slot.checked = false;
            }
        }

        self.reserved_notice = self.availability.notice();
        &self.availability
    }

    /// Re-evaluates coverage and updates the message element in place
    pub fn check_coverage(&mut self) -> Coverage {
        let coverage = self.rule.check(
            self.purpose.as_deref(),
            self.badges
                .iter()
                .filter(|badge| badge.checked)
                .map(|badge| badge.minutes),
            self.slots.iter().filter(|slot| slot.checked).count(),
        );

        if coverage.enforced {
            let message = self.coverage_message.get_or_insert_with(String::new);
            message.clear();
            message.push_str(&coverage.message());
        } else {
            self.coverage_message = None;
        }

        trace!("Coverage: {:?}", coverage);
        coverage
    }

    pub fn select_purpose(&mut self, purpose: Option<&str>) -> Coverage {
        self.purpose = purpose.map(str::to_string);
        self.check_coverage()
    }

    pub fn set_badge_checked(&mut self, index: usize, checked: bool) -> Result<Coverage, FormError> {
        let badge = self
            .badges
            .get_mut(index)
            .ok_or(FormError::UnknownBadge(index))?;
        badge.checked = checked;
        Ok(self.check_coverage())
    }

    pub fn set_slot_checked(&mut self, key: &str, checked: bool) -> Result<Coverage, FormError> {
        let slot = self
            .slots
            .iter_mut()
            .find(|slot| slot.key == key)
            .ok_or_else(|| FormError::UnknownSlot(key.to_string()))?;

        if checked && slot.disabled {
            return Err(FormError::SlotUnavailable(key.to_string()));
        }

        slot.checked = checked;
        Ok(self.check_coverage())
    }

    /// Changes the appointment date, then re-derives availability and coverage
    pub fn set_date(&mut self, date: Option<&str>) -> Coverage {
        self.date = date.map(str::to_string);
        self.refresh_availability();
        self.check_coverage()
    }

    /// Runs the coverage check one last time before the form is sent.
    /// An `Err` means the submission must be cancelled and the prompt shown.
    pub fn submit(&mut self) -> Result<(), SubmitBlocked> {
        self.check_coverage().ensure().map_err(|reason| {
            info!(purpose = self.purpose.as_deref().unwrap_or_default(); "Blocking submission: {}", reason);
            SubmitBlocked { reason }
        })
    }
}
