#![no_main]
use appointment_libs::coverage::check_coverage;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: (Vec<u32>, u16, u8, u16, bool)| {
    #[cfg(feature = "log")]
    let _ = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{}][{}] {}",
                record.target(),
                record.level(),
                message
            ))
        })
        .level(log::LevelFilter::Debug)
        .chain(std::io::stdout())
        .apply();

    let (badges, count, extra_slots, extra_minutes, checkout) = data;
    let count = usize::from(count);
    let purpose = if checkout { Some("checkout") } else { Some("other") };

    let coverage = check_coverage(purpose, badges.iter().copied(), count);

    if !checkout {
        assert!(coverage.satisfied, "Only checkout is ever unsatisfied");
    } else {
        assert_eq!(coverage.satisfied, coverage.covered_minutes >= coverage.required_minutes);
    }

    let more_slots = check_coverage(purpose, badges.iter().copied(), count + usize::from(extra_slots));
    assert!(
        !coverage.satisfied || more_slots.satisfied,
        "More slots turned {:?} into {:?}",
        coverage,
        more_slots
    );

    if !badges.is_empty() {
        let index = usize::from(extra_minutes) % badges.len();
        let mut heavier = badges.clone();
        heavier[index] = heavier[index].saturating_add(u32::from(extra_minutes));
        let after = check_coverage(purpose, heavier, count);
        assert!(
            coverage.satisfied || !after.satisfied,
            "More badge time turned {:?} into {:?}",
            coverage,
            after
        );
    }
});
