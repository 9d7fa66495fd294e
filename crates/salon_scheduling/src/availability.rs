//! Conflict filtering and stylist assignment.
//!
//! Busy intervals for a date are loaded once and partitioned by stylist.
//! Every check reduces to [`MinuteRange::overlaps`].

use crate::catalog::{Roster, Stylist};
use crate::error::SchedulingError;
use salon_common::models::BusyInterval;
use salon_common::{parse_clock_minutes, MinuteRange};
use std::collections::HashMap;
use tracing::{debug, error};

/// Busy ranges of one date, keyed by stylist id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BusySchedule {
    by_stylist: HashMap<String, Vec<MinuteRange>>,
}

impl BusySchedule {
    pub fn from_intervals(intervals: &[BusyInterval]) -> Result<Self, SchedulingError> {
        let mut by_stylist: HashMap<String, Vec<MinuteRange>> = HashMap::new();
        for interval in intervals {
            let range = interval.range().map_err(|e| {
                error!(
                    "Busy interval of {} has a malformed time {:?}",
                    interval.stylist_id, interval.time
                );
                SchedulingError::InvalidTimeFormat(e)
            })?;
            by_stylist
                .entry(interval.stylist_id.clone())
                .or_default()
                .push(range);
        }
        for ranges in by_stylist.values_mut() {
            ranges.sort_by_key(|r| r.start);
        }
        Ok(Self { by_stylist })
    }

    pub fn ranges(&self, stylist_id: &str) -> &[MinuteRange] {
        self.by_stylist
            .get(stylist_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn is_free(&self, stylist_id: &str, requested: &MinuteRange) -> bool {
        !self
            .ranges(stylist_id)
            .iter()
            .any(|busy| busy.overlaps(requested))
    }
}

fn parse_slots(slots: &[String]) -> Result<Vec<(u32, &String)>, SchedulingError> {
    slots
        .iter()
        .map(|slot| -> Result<_, SchedulingError> { Ok((parse_clock_minutes(slot)?, slot)) })
        .collect()
}

/// Keeps the slots at which at least one stylist of the roster is free.
pub fn filter_slots_any(
    slots: &[String],
    duration_minutes: u32,
    roster: &Roster,
    busy: &BusySchedule,
) -> Result<Vec<String>, SchedulingError> {
    let kept: Vec<String> = parse_slots(slots)?
        .into_iter()
        .filter(|(start, _)| {
            let requested = MinuteRange::new(*start, duration_minutes);
            roster.iter().any(|s| busy.is_free(&s.id, &requested))
        })
        .map(|(_, slot)| slot.clone())
        .collect();
    debug!("{} of {} slots have a free stylist", kept.len(), slots.len());
    Ok(kept)
}

/// Keeps the slots at which `stylist_id` is free.
pub fn filter_slots_for_stylist(
    slots: &[String],
    duration_minutes: u32,
    stylist_id: &str,
    busy: &BusySchedule,
) -> Result<Vec<String>, SchedulingError> {
    let kept: Vec<String> = parse_slots(slots)?
        .into_iter()
        .filter(|(start, _)| busy.is_free(stylist_id, &MinuteRange::new(*start, duration_minutes)))
        .map(|(_, slot)| slot.clone())
        .collect();
    debug!(
        "{} of {} slots are free for {}",
        kept.len(),
        slots.len(),
        stylist_id
    );
    Ok(kept)
}

/// First-fit: the first stylist in roster order who is free for `requested`.
///
/// Deterministic for a given roster and schedule. Load is not balanced, so the
/// first roster entries fill up first.
pub fn assign_stylist<'a>(
    roster: &'a Roster,
    busy: &BusySchedule,
    requested: &MinuteRange,
) -> Option<&'a Stylist> {
    roster.iter().find(|s| busy.is_free(&s.id, requested))
}
