use appointment_libs::availability::{ReservationRecord, RESERVED_NOTICE};
use appointment_libs::coverage::{CoverageError, SUBMIT_PROMPT};
use appointment_libs::form::{AppointmentForm, BadgeInput, FormError, FormState, SlotInput};
use appointment_libs::FormConfig;

fn slot(key: &str) -> SlotInput {
    SlotInput {
        key: key.to_string(),
        checked: false,
    }
}

fn badge(label: &str) -> BadgeInput {
    BadgeInput {
        label: label.to_string(),
        checked: false,
    }
}

fn checkout_state() -> FormState {
    FormState {
        purpose: Some("checkout".to_string()),
        date: Some("2024-03-04".to_string()),
        slots: vec![slot("slot_1"), slot("slot_2"), slot("slot_3"), slot("slot_4")],
        badges: vec![badge("Laser cutter 45 min"), badge("Table saw 30 min")],
        reservations: vec![
            ReservationRecord::new("slot_2", "2024-03-04T10:30:00-05:00"),
            ReservationRecord::new("slot_3", "2024-03-05T11:00:00-05:00"),
        ],
    }
}

#[test]
fn attach_labels_and_disables() {
    let form = AppointmentForm::attach(&FormConfig::default(), checkout_state(), "?start_time=10:00am");

    let labels = form
        .slots()
        .iter()
        .map(|slot| slot.time_label().unwrap_or_default())
        .collect::<Vec<_>>();
    assert_eq!(labels, vec!["(10:00am)", "(10:30am)", "(11:00am)", "(11:30am)"]);

    let disabled = form
        .slots()
        .iter()
        .filter(|slot| slot.disabled())
        .map(|slot| slot.key())
        .collect::<Vec<_>>();
    assert_eq!(disabled, vec!["slot_2"]);
    assert_eq!(form.reserved_notice(), None);

    // checkout with no badges selected yet: element exists, nothing to report
    assert_eq!(form.coverage_message(), Some(""));

    assert_eq!(form.purpose(), Some("checkout"));
    assert_eq!(form.date(), Some("2024-03-04"));
    assert_eq!(form.availability().unavailable_keys().collect::<Vec<_>>(), vec!["slot_2"]);
    assert!(!form.availability().all_unavailable());

    let badges = form
        .badges()
        .iter()
        .map(|badge| (badge.label(), badge.minutes(), badge.checked()))
        .collect::<Vec<_>>();
    assert_eq!(
        badges,
        vec![("Laser cutter 45 min", 45, false), ("Table saw 30 min", 30, false)]
    );
}

#[test]
fn oversized_badge_label_blocks_submit() {
    let mut state = checkout_state();
    state.badges = vec![BadgeInput {
        label: "Kiln 99999999999999999999 min".to_string(),
        checked: true,
    }];
    state.slots.iter_mut().for_each(|slot| slot.checked = true);

    let mut form = AppointmentForm::attach(&FormConfig::default(), state, "");
    assert_eq!(form.badges()[0].minutes(), u32::MAX);
    assert!(form.submit().is_err());
}

#[cfg(feature = "serde")]
#[test]
fn attaches_from_page_json() {
    let state: FormState = serde_json::from_str(
        r#"{
            "purpose": "checkout",
            "date": "2024-03-04",
            "slots": [{ "key": " slot_1 ", "checked": true }, { "key": "slot_2" }],
            "badges": [{ "label": "Router 60 minutes", "checked": true }],
            "reservations": [{ "slotKey": "slot_2 ", "dateTime": "2024-03-04T09:00:00Z" }]
        }"#,
    )
    .unwrap();

    let config: FormConfig = serde_json::from_str(r#"{ "slotMinutes": 60 }"#).unwrap();
    assert_eq!(config.coverage_purpose, "checkout");

    let mut form = AppointmentForm::attach(&config, state, "start_time=1:00pm");
    assert_eq!(form.purpose(), Some("checkout"));
    assert!(form.availability().is_unavailable("slot_2"));
    assert_eq!(form.slots()[1].time_label(), Some("(2:00pm)"));
    assert_eq!(form.submit(), Ok(()));
}

#[test]
fn relabel_does_not_duplicate() {
    let mut form = AppointmentForm::attach(&FormConfig::default(), checkout_state(), "start_time=10:00am");
    let before = form.slots().to_vec();

    assert_eq!(form.relabel("start_time=10:00am"), 0);
    assert_eq!(form.relabel("start_time=1:00pm"), 0);
    assert_eq!(form.slots(), &before[..]);
}

#[test]
fn missing_start_time_leaves_slots_unlabeled() {
    let mut form = AppointmentForm::attach(&FormConfig::default(), checkout_state(), "");
    assert!(form.slots().iter().all(|slot| slot.time_label().is_none()));

    // a later rebuild with a start time fills them in once
    assert_eq!(form.relabel("?start_time=8:00am"), 4);
    assert_eq!(form.slots()[3].time_label(), Some("(9:30am)"));
    assert_eq!(form.relabel("?start_time=8:00am"), 0);
}

#[test]
fn coverage_follows_selection_events() {
    let mut form = AppointmentForm::attach(&FormConfig::default(), checkout_state(), "");

    let coverage = form.set_badge_checked(0, true).unwrap();
    assert_eq!(coverage.required_minutes, 45);
    assert!(!coverage.satisfied);
    assert_eq!(
        form.coverage_message(),
        Some("Please select enough slots (0 min) to cover the required badge time of 45 minutes.")
    );

    form.set_slot_checked("slot_1", true).unwrap();
    assert_eq!(
        form.coverage_message(),
        Some("Please select enough slots (30 min) to cover the required badge time of 45 minutes.")
    );

    let coverage = form.set_slot_checked("slot_3", true).unwrap();
    assert!(coverage.satisfied);
    assert_eq!(coverage.covered_minutes, 60);
    assert_eq!(form.coverage_message(), Some(""));

    let coverage = form.set_badge_checked(1, true).unwrap();
    assert_eq!(coverage.required_minutes, 75);
    assert!(!coverage.satisfied);

    // leaving checkout removes the message altogether
    let coverage = form.select_purpose(Some("consultation"));
    assert!(coverage.satisfied);
    assert_eq!(form.coverage_message(), None);

    form.select_purpose(Some("checkout"));
    assert!(form.coverage_message().unwrap().contains("75 minutes"));
}

#[test]
fn submit_blocks_until_covered() {
    let mut form = AppointmentForm::attach(&FormConfig::default(), checkout_state(), "");
    form.set_badge_checked(0, true).unwrap();
    form.set_slot_checked("slot_1", true).unwrap();

    let blocked = form.submit().unwrap_err();
    assert_eq!(
        blocked.reason,
        CoverageError::InsufficientSlots {
            covered_minutes: 30,
            required_minutes: 45
        }
    );
    assert_eq!(blocked.prompt(), SUBMIT_PROMPT);
    assert!(blocked.to_string().contains("(30 min)"));

    form.set_slot_checked("slot_4", true).unwrap();
    assert_eq!(form.submit(), Ok(()));
}

#[test]
fn non_checkout_submits_freely() {
    let mut state = checkout_state();
    state.purpose = Some("tour".to_string());
    state.badges[0].checked = true;

    let mut form = AppointmentForm::attach(&FormConfig::default(), state, "");
    assert_eq!(form.coverage_message(), None);
    assert_eq!(form.submit(), Ok(()));

    form.select_purpose(None);
    assert_eq!(form.submit(), Ok(()));
}

#[test]
fn reserved_slots_cannot_be_selected() {
    let mut form = AppointmentForm::attach(&FormConfig::default(), checkout_state(), "");

    assert_eq!(
        form.set_slot_checked("slot_2", true),
        Err(FormError::SlotUnavailable("slot_2".to_string()))
    );
    assert_eq!(
        form.set_slot_checked("slot_9", true),
        Err(FormError::UnknownSlot("slot_9".to_string()))
    );
    assert_eq!(form.set_badge_checked(7, true), Err(FormError::UnknownBadge(7)));

    // unchecking a reserved slot is harmless
    assert!(form.set_slot_checked("slot_2", false).is_ok());
}

#[test]
fn changing_date_rederives_availability() {
    let mut form = AppointmentForm::attach(&FormConfig::default(), checkout_state(), "");
    form.set_badge_checked(1, true).unwrap();
    form.set_slot_checked("slot_3", true).unwrap();
    assert!(form.submit().is_ok());

    // slot_3 is taken on the 5th: it gets disabled and unchecked
    let coverage = form.set_date(Some("2024-03-05"));
    assert!(!coverage.satisfied);
    let slot_3 = &form.slots()[2];
    assert!(slot_3.disabled() && !slot_3.checked());
    assert!(!form.slots()[1].disabled());

    form.set_date(None);
    assert!(form.slots().iter().all(|slot| !slot.disabled()));
}

#[test]
fn fully_booked_day_shows_notice_once() {
    let mut state = checkout_state();
    state.reservations = state
        .slots
        .iter()
        .map(|slot| ReservationRecord::new(&slot.key, "2024-03-04T09:00:00"))
        .chain(std::iter::once(ReservationRecord::new("slot_1", "2024-03-04")))
        .collect();

    let mut form = AppointmentForm::attach(&FormConfig::default(), state, "");
    assert!(form.slots().iter().all(|slot| slot.disabled()));
    assert_eq!(form.reserved_notice(), Some(RESERVED_NOTICE));

    form.refresh_availability();
    form.refresh_availability();
    assert_eq!(form.reserved_notice(), Some(RESERVED_NOTICE));

    form.set_date(Some("2024-03-06"));
    assert_eq!(form.reserved_notice(), None);
}

#[test]
fn slot_length_comes_from_config() {
    let config = FormConfig {
        slot_minutes: 15,
        ..FormConfig::default()
    };
    let mut form = AppointmentForm::attach(&config, checkout_state(), "start_time=9:50am");

    assert_eq!(form.slots()[2].time_label(), Some("(10:20am)"));

    form.set_badge_checked(1, true).unwrap();
    let coverage = form.set_slot_checked("slot_1", true).unwrap();
    assert_eq!(coverage.covered_minutes, 15);
    assert!(!coverage.satisfied);
}
