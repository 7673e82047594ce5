#![no_main]
use appointment_libs::time::{label_slots_every, TimeOfDay};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: (Option<TimeOfDay>, u8, u8, String)| {
    let (base, count, slot_minutes, raw) = data;
    let count = usize::from(count);
    let slot_minutes = u32::from(slot_minutes);

    let labels = label_slots_every(base, count, slot_minutes);

    match base {
        None => assert!(labels.is_empty(), "No base time should give no labels"),
        Some(base) => {
            assert_eq!(labels.len(), count, "One label per slot");
            if let Some(first) = labels.first() {
                assert_eq!(*first, base, "First slot starts at the base time");
            }
            for (l, r) in labels.iter().zip(labels.iter().skip(1)) {
                assert_eq!(
                    l.add_minutes(slot_minutes),
                    *r,
                    "Slots should be {} minutes apart",
                    slot_minutes
                );
            }
        }
    }

    if let Some(base) = base {
        let shown = base.to_string();
        assert_eq!(
            TimeOfDay::parse_start_time(&shown),
            Some(base),
            "Displayed time {} should parse back",
            shown
        );
    }

    // arbitrary text must never panic
    if let Some(time) = TimeOfDay::parse_start_time(&raw) {
        assert!(time.hour() < 24 && time.minute() < 60);
    }
});
