#[cfg(test)]
mod tests {
    use crate::hours::DayHours;
    use crate::slots::{slot_minutes, SLOT_STEP_MINUTES};
    use proptest::prelude::*;
    use salon_common::{format_clock_minutes, parse_clock_minutes};

    fn open_day() -> impl Strategy<Value = (u32, u32)> {
        (0u32..1380).prop_flat_map(|start| (Just(start), (start + 1)..=1439))
    }

    proptest! {
        #[test]
        fn test_every_slot_fits_before_closing(
            (start, end) in open_day(),
            duration in 1u32..600,
        ) {
            let slots = slot_minutes(DayHours::Open { start, end }, duration);
            for t in &slots {
                prop_assert!(*t >= start);
                prop_assert!(t + duration <= end);
            }
        }

        #[test]
        fn test_slots_are_evenly_spaced_and_sorted(
            (start, end) in open_day(),
            duration in 1u32..600,
        ) {
            let slots = slot_minutes(DayHours::Open { start, end }, duration);
            if let Some(first) = slots.first() {
                prop_assert_eq!(*first, start);
            }
            for pair in slots.windows(2) {
                prop_assert_eq!(pair[1] - pair[0], SLOT_STEP_MINUTES);
            }
            // The next step would not fit
            if let Some(last) = slots.last() {
                prop_assert!(last + SLOT_STEP_MINUTES + duration > end);
            }
        }

        #[test]
        fn test_too_long_services_get_nothing(
            (start, end) in open_day(),
            extra in 1u32..600,
        ) {
            let duration = end - start + extra;
            let slots = slot_minutes(DayHours::Open { start, end }, duration);
            prop_assert!(slots.is_empty(), "{:?} fit into {}..{}", slots, start, end);
        }

        #[test]
        fn test_closed_day_gets_nothing(duration in 0u32..2000) {
            prop_assert!(slot_minutes(DayHours::Closed, duration).is_empty());
        }

        #[test]
        fn test_slot_strings_parse_back(
            (start, end) in open_day(),
            duration in 1u32..240,
        ) {
            for t in slot_minutes(DayHours::Open { start, end }, duration) {
                prop_assert_eq!(parse_clock_minutes(&format_clock_minutes(t)).unwrap(), t);
            }
        }
    }
}
