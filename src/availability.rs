use itertools::Itertools;
use log::{debug, trace};
use std::collections::BTreeSet;

/// Advisory shown once when nothing is left to book on the selected day
pub const RESERVED_NOTICE: &str = "All time slots are reserved for this day.";

/// An existing booking of one slot on one day
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase", from = "RawReservation")
)]
pub struct ReservationRecord {
    slot_key: String,
    date: String,
}

impl ReservationRecord {
    /// The slot key is trimmed and only the calendar part of `date_time` is kept,
    /// so both `2024-01-01` and `2024-01-01T09:00:00Z` are accepted.
    pub fn new(slot_key: &str, date_time: &str) -> ReservationRecord {
        ReservationRecord {
            slot_key: slot_key.trim().to_string(),
            date: calendar_date(date_time).to_string(),
        }
    }

    pub fn slot_key(&self) -> &str {
        &self.slot_key
    }

    pub fn date(&self) -> &str {
        &self.date
    }
}

/// A reservation as the page lists it, before normalization
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawReservation {
    slot_key: String,
    #[serde(alias = "dateTime")]
    date: String,
}

#[cfg(feature = "serde")]
impl From<RawReservation> for ReservationRecord {
    fn from(raw: RawReservation) -> Self {
        ReservationRecord::new(&raw.slot_key, &raw.date)
    }
}

/// Calendar portion of an ISO-8601 date or date-time
///
/// # Examples
/// ```
/// use appointment_libs::availability::calendar_date;
///
/// assert_eq!(calendar_date("2024-01-01T12:30:00+02:00"), "2024-01-01");
/// assert_eq!(calendar_date(" 2024-01-01 "), "2024-01-01");
/// ```
pub fn calendar_date(value: &str) -> &str {
    let value = value.trim();
    match value.split_once('T') {
        Some((date, _)) => date,
        None => value,
    }
}

/// Slots that cannot be booked on the selected day
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize),
    serde(rename_all = "camelCase")
)]
pub struct Availability {
    unavailable_keys: BTreeSet<String>,
    all_unavailable: bool,
}

impl Availability {
    pub fn is_unavailable(&self, slot_key: &str) -> bool {
        self.unavailable_keys.contains(slot_key)
    }

    pub fn unavailable_keys(&self) -> impl Iterator<Item = &str> {
        self.unavailable_keys.iter().map(String::as_str)
    }

    pub fn all_unavailable(&self) -> bool {
        self.all_unavailable
    }

    /// The advisory to show, if every slot is taken
    pub fn notice(&self) -> Option<&'static str> {
        if self.all_unavailable {
            Some(RESERVED_NOTICE)
        } else {
            None
        }
    }
}

/// Cross-references existing reservations with the selected date.
/// Reservations for slots not in `all_slot_keys` are ignored, duplicates collapse.
///
/// # Examples
/// ```
/// use appointment_libs::availability::{compute_unavailable, ReservationRecord};
/// use std::collections::BTreeSet;
///
/// let reservations = vec![ReservationRecord::new("A", "2024-01-01T10:00:00")];
/// let keys: BTreeSet<String> = ["A", "B"].iter().map(|k| k.to_string()).collect();
///
/// let availability = compute_unavailable(Some("2024-01-01"), &reservations, &keys);
/// assert!(availability.is_unavailable("A"));
/// assert!(!availability.all_unavailable());
///
/// let availability = compute_unavailable(None, &reservations, &keys);
/// assert_eq!(availability.unavailable_keys().count(), 0);
/// ```
pub fn compute_unavailable(
    selected_date: Option<&str>,
    reservations: &[ReservationRecord],
    all_slot_keys: &BTreeSet<String>,
) -> Availability {
    let selected_date = match selected_date.map(calendar_date) {
        Some(date) if !date.is_empty() => date,
        _ => return Availability::default(),
    };

    if reservations.is_empty() {
        return Availability::default();
    }

    let unavailable_keys: BTreeSet<String> = reservations
        .iter()
        .filter(|reservation| calendar_date(reservation.date()) == selected_date)
        .inspect(|reservation| trace!("Slot {} reserved on {}", reservation.slot_key(), selected_date))
        .map(ReservationRecord::slot_key)
        .filter(|key| all_slot_keys.contains(*key))
        .map(str::to_string)
        .collect();

    let all_unavailable =
        !all_slot_keys.is_empty() && all_slot_keys.iter().all(|key| unavailable_keys.contains(key));

    debug!(
        "Unavailable on {}: [{}]{}",
        selected_date,
        unavailable_keys.iter().join(", "),
        if all_unavailable { " (all slots)" } else { "" }
    );

    Availability {
        unavailable_keys,
        all_unavailable,
    }
}
