use appointment_libs::availability::{compute_unavailable, ReservationRecord};
use appointment_libs::coverage::check_coverage;
use appointment_libs::form::{AppointmentForm, BadgeInput, FormState, SlotInput};
use appointment_libs::time::{label_slots, TimeOfDay};
use appointment_libs::FormConfig;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::collections::BTreeSet;

fn form_state() -> FormState {
    FormState {
        purpose: Some("checkout".to_string()),
        date: Some("2024-03-04".to_string()),
        slots: (0..24)
            .map(|i| SlotInput {
                key: format!("slot_{}", i),
                checked: i % 3 == 0,
            })
            .collect(),
        badges: (0..12)
            .map(|i| BadgeInput {
                label: format!("Badge {} - {} minutes", i, 15 * (i % 4)),
                checked: i % 2 == 0,
            })
            .collect(),
        reservations: (0..40)
            .map(|i| {
                ReservationRecord::new(
                    &format!("slot_{}", i % 24),
                    &format!("2024-03-{:02}T10:00:00", 1 + i % 7),
                )
            })
            .collect(),
    }
}

fn form_checks(c: &mut Criterion) {
    c.bench_function("label_slots", |b| {
        let base = TimeOfDay::parse_start_time("9:00am");
        b.iter(|| black_box(label_slots(base, 48)))
    });

    c.bench_function("compute_unavailable", |b| {
        let state = form_state();
        let keys: BTreeSet<String> = state.slots.iter().map(|s| s.key.clone()).collect();
        b.iter(|| {
            black_box(compute_unavailable(
                Some("2024-03-04"),
                &state.reservations,
                &keys,
            ))
        })
    });

    c.bench_function("check_coverage", |b| {
        let minutes = vec![30, 45, 15, 60, 0, 90];
        b.iter(|| black_box(check_coverage(Some("checkout"), minutes.iter().copied(), 5)))
    });

    c.bench_function("attach", |b| {
        let config = FormConfig::default();
        b.iter(|| {
            black_box(AppointmentForm::attach(
                &config,
                form_state(),
                "?start_time=9:00am",
            ))
        })
    });

    c.bench_function("slot change", |b| {
        let mut form = AppointmentForm::attach(&FormConfig::default(), form_state(), "");
        b.iter(|| {
            black_box(form.set_slot_checked("slot_1", false)).ok();
        })
    });
}

criterion_group!(benches, form_checks);
criterion_main!(benches);
