#[cfg(test)]
mod tests {
    use crate::availability::{assign_stylist, filter_slots_any, filter_slots_for_stylist, BusySchedule};
    use crate::catalog::{Roster, Stylist};
    use proptest::prelude::*;
    use salon_common::models::BusyInterval;
    use salon_common::{format_clock_minutes, MinuteRange};

    const STYLISTS: [&str; 3] = ["jennifer", "heather", "maria"];

    fn roster() -> Roster {
        Roster::new(
            STYLISTS
                .iter()
                .map(|id| Stylist {
                    id: id.to_string(),
                    name: id.to_string(),
                    phone: "2565550100".to_string(),
                })
                .collect(),
        )
        .unwrap()
    }

    fn busy_intervals() -> impl Strategy<Value = Vec<BusyInterval>> {
        prop::collection::vec((0usize..3, 0u32..96, 1u32..12), 0..12).prop_map(|raw| {
            raw.into_iter()
                .map(|(who, quarter, quarters)| BusyInterval {
                    stylist_id: STYLISTS[who].to_string(),
                    time: format_clock_minutes(quarter * 15),
                    duration_minutes: quarters * 15,
                })
                .collect()
        })
    }

    fn slots() -> Vec<String> {
        (32u32..80).map(|q| format_clock_minutes(q * 15)).collect()
    }

    proptest! {
        #[test]
        fn test_assignment_is_deterministic(
            intervals in busy_intervals(),
            start in 32u32..80,
            duration in 1u32..180,
        ) {
            let schedule = BusySchedule::from_intervals(&intervals).unwrap();
            let roster = roster();
            let requested = MinuteRange::new(start * 15, duration);
            let first = assign_stylist(&roster, &schedule, &requested).map(|s| s.id.clone());
            let second = assign_stylist(&roster, &schedule, &requested).map(|s| s.id.clone());
            prop_assert_eq!(first, second);
        }

        #[test]
        fn test_assigned_stylist_has_no_overlap(
            intervals in busy_intervals(),
            start in 32u32..80,
            duration in 1u32..180,
        ) {
            let schedule = BusySchedule::from_intervals(&intervals).unwrap();
            let roster = roster();
            let requested = MinuteRange::new(start * 15, duration);
            match assign_stylist(&roster, &schedule, &requested) {
                Some(stylist) => {
                    for busy in intervals.iter().filter(|b| b.stylist_id == stylist.id) {
                        prop_assert!(!busy.range().unwrap().overlaps(&requested));
                    }
                    // Everyone earlier in the roster was busy
                    for earlier in roster.iter().take_while(|s| s.id != stylist.id) {
                        prop_assert!(!schedule.is_free(&earlier.id, &requested));
                    }
                }
                None => {
                    for s in roster.iter() {
                        prop_assert!(!schedule.is_free(&s.id, &requested));
                    }
                }
            }
        }

        #[test]
        fn test_any_mode_is_the_union_of_specific_modes(
            intervals in busy_intervals(),
            duration in 15u32..120,
        ) {
            let schedule = BusySchedule::from_intervals(&intervals).unwrap();
            let slots = slots();
            let any = filter_slots_any(&slots, duration, &roster(), &schedule).unwrap();
            let union: Vec<String> = slots
                .iter()
                .filter(|slot| {
                    STYLISTS.iter().any(|id| {
                        filter_slots_for_stylist(&slots, duration, id, &schedule)
                            .unwrap()
                            .contains(slot)
                    })
                })
                .cloned()
                .collect();
            prop_assert_eq!(any, union);
        }
    }
}
