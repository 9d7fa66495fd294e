#[cfg(test)]
mod tests {
    use crate::clock::{format_clock_minutes, parse_clock_minutes, MinuteRange};
    use proptest::prelude::*;

    fn range() -> impl Strategy<Value = MinuteRange> {
        (0u32..1440, 1u32..480).prop_map(|(start, duration)| MinuteRange::new(start, duration))
    }

    proptest! {
        // Any hand-written valid clock string denotes the same instant after a round trip
        #[test]
        fn test_round_trip_preserves_instant(
            hour in 1u32..=12,
            minute in 0u32..60,
            pm in any::<bool>(),
            zero_padded in any::<bool>(),
        ) {
            let period = if pm { "PM" } else { "AM" };
            let text = if zero_padded {
                format!("{hour:02}:{minute:02} {period}")
            } else {
                format!("{hour}:{minute:02} {period}")
            };
            let parsed = parse_clock_minutes(&text).expect("generated string is valid");
            prop_assert!(parsed < 1440);
            let formatted = format_clock_minutes(parsed);
            prop_assert_eq!(parse_clock_minutes(&formatted), Ok(parsed));
            prop_assert_eq!(formatted, format!("{hour}:{minute:02} {period}"));
        }

        #[test]
        fn test_parse_is_injective(a in 0u32..1440, b in 0u32..1440) {
            let pa = parse_clock_minutes(&format_clock_minutes(a)).expect("valid");
            let pb = parse_clock_minutes(&format_clock_minutes(b)).expect("valid");
            prop_assert_eq!(a == b, pa == pb);
        }

        #[test]
        fn test_overlap_is_symmetric(a in range(), b in range()) {
            prop_assert_eq!(a.overlaps(&b), b.overlaps(&a));
        }

        #[test]
        fn test_touching_ranges_never_overlap(a in range(), duration in 1u32..480) {
            let next = MinuteRange::new(a.end, duration);
            prop_assert!(!a.overlaps(&next));
            prop_assert!(!next.overlaps(&a));
        }

        #[test]
        fn test_identical_ranges_always_overlap(a in range()) {
            prop_assert!(a.overlaps(&a));
        }
    }
}
