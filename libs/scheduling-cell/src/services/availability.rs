//! The appointment availability engine.
//!
//! Given the clinic's recurring working hours, the date's blocks, and the
//! date's existing appointments, computes which slot start times are still
//! bookable. The computation itself is pure; all I/O happens up front through
//! the [`ScheduleStore`] seam.

use chrono::{Datelike, NaiveDate, Weekday};
use tracing::debug;
use uuid::Uuid;

use crate::catalog::{resolve_service_duration, MIN_APPOINTMENT_SEPARATION_MINUTES};
use crate::error::SchedulingError;
use crate::models::{BookedAppointment, DateBlock, WorkingWindow};
use crate::store::ScheduleStore;
use crate::time::{intervals_overlap, minutes_to_clock};

/// Day of week with the clinic's convention: 0 = Sunday .. 6 = Saturday.
pub fn day_of_week(date: NaiveDate) -> i32 {
    match date.weekday() {
        Weekday::Sun => 0,
        Weekday::Mon => 1,
        Weekday::Tue => 2,
        Weekday::Wed => 3,
        Weekday::Thu => 4,
        Weekday::Fri => 5,
        Weekday::Sat => 6,
    }
}

/// Compute bookable slot start times (minutes since midnight) for one day.
///
/// `conflicting_appointments` must already be narrowed to appointments that
/// actually hold capacity - cancelled ones and the appointment being
/// rescheduled are the caller's job to drop.
///
/// Candidates step through each active window at the fixed minimum
/// separation, and a candidate survives only if:
/// - the whole requested duration fits inside that single window (a slot is
///   never split across two windows, even adjacent ones),
/// - it overlaps no block (full-day blocks reject unconditionally),
/// - it overlaps no conflicting appointment, each sized by its own service
///   type.
///
/// The result is deduplicated and sorted ascending; overlapping windows may
/// otherwise emit the same start twice.
pub fn compute_slots(
    windows: &[WorkingWindow],
    blocks: &[DateBlock],
    conflicting_appointments: &[BookedAppointment],
    requested_duration: i32,
) -> Vec<i32> {
    let mut slots = Vec::new();

    for window in windows.iter().filter(|w| w.is_active) {
        let mut candidate = window.start_minutes;

        while candidate < window.end_minutes {
            let fits_window = candidate + requested_duration <= window.end_minutes;

            if fits_window
                && !overlaps_any_block(candidate, requested_duration, blocks)
                && !overlaps_any_appointment(
                    candidate,
                    requested_duration,
                    conflicting_appointments,
                )
            {
                slots.push(candidate);
            }

            candidate += MIN_APPOINTMENT_SEPARATION_MINUTES;
        }
    }

    slots.sort_unstable();
    slots.dedup();
    slots
}

fn overlaps_any_block(candidate: i32, duration: i32, blocks: &[DateBlock]) -> bool {
    blocks.iter().filter(|b| b.is_active).any(|block| {
        match (block.start_minutes, block.end_minutes) {
            (Some(start), Some(end)) => intervals_overlap(candidate, duration, start, end - start),
            // Either bound missing means the whole day is blocked.
            _ => true,
        }
    })
}

fn overlaps_any_appointment(
    candidate: i32,
    duration: i32,
    appointments: &[BookedAppointment],
) -> bool {
    appointments.iter().any(|appointment| {
        let appointment_duration = resolve_service_duration(Some(&appointment.service_type));
        intervals_overlap(
            candidate,
            duration,
            appointment.start_minutes,
            appointment_duration,
        )
    })
}

/// Read-time availability queries over a [`ScheduleStore`].
///
/// The service only advises: computing a slot and booking it are not atomic,
/// so two callers can both see the same slot free and race into a double
/// booking. Exclusivity belongs to the booking write path (a uniqueness
/// constraint on `(date, start_time)` or equivalent), not here.
pub struct AvailabilityService<S: ScheduleStore> {
    store: S,
}

impl<S: ScheduleStore> AvailabilityService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Bookable `HH:MM` slot starts for a date, sorted ascending.
    ///
    /// `service_type` sizes the candidate slots (unknown or absent falls back
    /// to the catalog default). `exclude_appointment_id` removes one
    /// appointment from the conflict set so a reschedule does not collide
    /// with its own current slot.
    pub async fn available_slots(
        &self,
        date: NaiveDate,
        service_type: Option<&str>,
        exclude_appointment_id: Option<Uuid>,
    ) -> Result<Vec<String>, SchedulingError> {
        let dow = day_of_week(date);
        let windows = self.store.list_active_working_windows(dow).await?;

        // No working hours means no slots, whatever blocks or appointments say.
        if windows.is_empty() {
            debug!("No active working windows for {} (day {})", date, dow);
            return Ok(vec![]);
        }

        let blocks = self.store.list_active_date_blocks(date).await?;
        let appointments = self.store.list_appointments(date).await?;

        let conflicting: Vec<BookedAppointment> = appointments
            .into_iter()
            .filter(|a| a.blocks_capacity())
            .filter(|a| Some(a.id) != exclude_appointment_id)
            .collect();

        let requested_duration = resolve_service_duration(service_type);
        let slots = compute_slots(&windows, &blocks, &conflicting, requested_duration);

        debug!(
            "Computed {} available slots for {} (duration {} min)",
            slots.len(),
            date,
            requested_duration
        );

        Ok(slots.into_iter().map(minutes_to_clock).collect())
    }

    /// Whether the date has no capacity at all before appointments are even
    /// considered: either a full-day block exists, or the day of week has no
    /// active working windows. A date consumed slot-by-slot with partial
    /// blocks and bookings is not "fully blocked".
    pub async fn is_date_fully_blocked(&self, date: NaiveDate) -> Result<bool, SchedulingError> {
        let windows = self
            .store
            .list_active_working_windows(day_of_week(date))
            .await?;

        if windows.is_empty() {
            return Ok(true);
        }

        let blocks = self.store.list_active_date_blocks(date).await?;
        Ok(blocks.iter().any(|b| b.is_active && b.is_full_day()))
    }
}

// ==============================================================================
// TESTS
// ==============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AppointmentStatus;
    use crate::store::MockScheduleStore;
    use crate::time::clock_to_minutes;

    fn hm(clock: &str) -> i32 {
        clock_to_minutes(clock).unwrap()
    }

    fn window(start: &str, end: &str) -> WorkingWindow {
        WorkingWindow {
            id: Uuid::new_v4(),
            day_of_week: 1,
            start_minutes: hm(start),
            end_minutes: hm(end),
            is_active: true,
        }
    }

    fn partial_block(start: &str, end: &str) -> DateBlock {
        DateBlock {
            id: Uuid::new_v4(),
            block_date: monday(),
            start_minutes: Some(hm(start)),
            end_minutes: Some(hm(end)),
            is_active: true,
        }
    }

    fn full_day_block() -> DateBlock {
        DateBlock {
            id: Uuid::new_v4(),
            block_date: monday(),
            start_minutes: None,
            end_minutes: None,
            is_active: true,
        }
    }

    fn appointment(start: &str, service_type: &str) -> BookedAppointment {
        BookedAppointment {
            id: Uuid::new_v4(),
            appointment_date: monday(),
            start_minutes: hm(start),
            service_type: service_type.to_string(),
            status: AppointmentStatus::Scheduled,
        }
    }

    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 16).unwrap()
    }

    fn as_clocks(slots: Vec<i32>) -> Vec<String> {
        slots.into_iter().map(minutes_to_clock).collect()
    }

    #[test]
    fn sunday_is_day_zero() {
        assert_eq!(day_of_week(NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()), 0);
        assert_eq!(day_of_week(monday()), 1);
        assert_eq!(day_of_week(NaiveDate::from_ymd_opt(2025, 6, 21).unwrap()), 6);
    }

    #[test]
    fn no_windows_means_no_slots() {
        let slots = compute_slots(&[], &[full_day_block()], &[], 30);
        assert!(slots.is_empty());
    }

    #[test]
    fn inactive_windows_are_ignored() {
        let mut w = window("09:00", "12:00");
        w.is_active = false;
        assert!(compute_slots(&[w], &[], &[], 30).is_empty());
    }

    #[test]
    fn hour_long_service_must_fit_inside_the_window() {
        // 09:00-12:00 window, 60 minute service: 11:30 would spill to 12:30.
        let slots = compute_slots(&[window("09:00", "12:00")], &[], &[], 60);
        assert_eq!(
            as_clocks(slots),
            vec!["09:00", "09:30", "10:00", "10:30", "11:00"]
        );
    }

    #[test]
    fn full_day_block_clears_the_day() {
        let slots = compute_slots(&[window("09:00", "12:00")], &[full_day_block()], &[], 60);
        assert!(slots.is_empty());
    }

    #[test]
    fn partial_block_rejects_only_overlapping_candidates() {
        // 09:30 ends exactly at the block start, so it survives (half-open).
        let slots = compute_slots(
            &[window("09:00", "12:00")],
            &[partial_block("10:00", "10:30")],
            &[],
            30,
        );
        assert_eq!(
            as_clocks(slots),
            vec!["09:00", "09:30", "10:30", "11:00", "11:30"]
        );
    }

    #[test]
    fn block_with_one_missing_bound_acts_as_full_day() {
        let mut half_open_block = full_day_block();
        half_open_block.start_minutes = Some(hm("10:00"));

        let slots = compute_slots(&[window("09:00", "12:00")], &[half_open_block], &[], 30);
        assert!(slots.is_empty());
    }

    #[test]
    fn inactive_blocks_do_not_reject() {
        let mut b = full_day_block();
        b.is_active = false;
        let slots = compute_slots(&[window("09:00", "10:00")], &[b], &[], 30);
        assert_eq!(as_clocks(slots), vec!["09:00", "09:30"]);
    }

    #[test]
    fn appointment_blocks_by_its_own_service_duration() {
        // A 60-minute grooming at 09:30 occupies [09:30, 10:30). The 10:30
        // candidate touches the boundary exactly and stays available.
        let slots = compute_slots(
            &[window("09:00", "12:00")],
            &[],
            &[appointment("09:30", "grooming")],
            30,
        );
        assert_eq!(as_clocks(slots), vec!["09:00", "10:30", "11:00", "11:30"]);
    }

    #[test]
    fn unknown_appointment_service_defaults_to_thirty_minutes() {
        let slots = compute_slots(
            &[window("09:00", "11:00")],
            &[],
            &[appointment("09:30", "hydrotherapy")],
            30,
        );
        assert_eq!(as_clocks(slots), vec!["09:00", "10:00", "10:30"]);
    }

    #[test]
    fn candidate_step_is_fixed_regardless_of_requested_duration() {
        // Two 60-minute services may start 30 minutes apart; the step never
        // widens to the service duration.
        let slots = compute_slots(&[window("09:00", "11:00")], &[], &[], 60);
        assert_eq!(as_clocks(slots), vec!["09:00", "09:30", "10:00"]);
    }

    #[test]
    fn window_end_not_aligned_to_step_still_bounds_the_last_slot() {
        // 09:00-09:45 window: 09:30 + 30 minutes would end at 10:00.
        let slots = compute_slots(&[window("09:00", "09:45")], &[], &[], 30);
        assert_eq!(as_clocks(slots), vec!["09:00"]);
    }

    #[test]
    fn split_day_windows_are_scanned_independently() {
        // 60-minute service: 10:30 can't spill from the morning window into
        // the afternoon one even though they are back to back in spirit.
        let slots = compute_slots(
            &[window("09:00", "11:00"), window("14:00", "16:00")],
            &[],
            &[],
            60,
        );
        assert_eq!(
            as_clocks(slots),
            vec!["09:00", "09:30", "10:00", "14:00", "14:30", "15:00"]
        );
    }

    #[test]
    fn overlapping_windows_emit_sorted_deduplicated_slots() {
        let slots = compute_slots(
            &[window("10:00", "12:00"), window("09:00", "11:00")],
            &[],
            &[],
            30,
        );
        assert_eq!(
            as_clocks(slots),
            vec!["09:00", "09:30", "10:00", "10:30", "11:00", "11:30"]
        );
    }

    // --------------------------------------------------------------------------
    // Service-level tests over a mocked store
    // --------------------------------------------------------------------------

    #[tokio::test]
    async fn short_circuits_to_empty_when_day_has_no_windows() {
        let mut store = MockScheduleStore::new();
        store
            .expect_list_active_working_windows()
            .returning(|_| Ok(vec![]));
        // No block/appointment expectations: the service must not fetch them.

        let service = AvailabilityService::new(store);
        let slots = service.available_slots(monday(), None, None).await.unwrap();
        assert!(slots.is_empty());
    }

    #[tokio::test]
    async fn cancelled_appointments_free_their_slot() {
        let mut cancelled = appointment("09:00", "consultation");
        cancelled.status = AppointmentStatus::Cancelled;

        let mut store = MockScheduleStore::new();
        store
            .expect_list_active_working_windows()
            .returning(|_| Ok(vec![window("09:00", "10:00")]));
        store
            .expect_list_active_date_blocks()
            .returning(|_| Ok(vec![]));
        store
            .expect_list_appointments()
            .returning(move |_| Ok(vec![cancelled.clone()]));

        let service = AvailabilityService::new(store);
        let slots = service.available_slots(monday(), None, None).await.unwrap();
        assert_eq!(slots, vec!["09:00", "09:30"]);
    }

    #[tokio::test]
    async fn excluding_the_rescheduled_appointment_frees_its_slot() {
        let existing = appointment("10:00", "consultation");
        let existing_id = existing.id;

        let mut store = MockScheduleStore::new();
        store
            .expect_list_active_working_windows()
            .returning(|_| Ok(vec![window("10:00", "11:00")]));
        store
            .expect_list_active_date_blocks()
            .returning(|_| Ok(vec![]));
        store
            .expect_list_appointments()
            .returning(move |_| Ok(vec![existing.clone()]));

        let service = AvailabilityService::new(store);

        let without_exclusion = service.available_slots(monday(), None, None).await.unwrap();
        assert_eq!(without_exclusion, vec!["10:30"]);

        let while_editing = service
            .available_slots(monday(), None, Some(existing_id))
            .await
            .unwrap();
        assert_eq!(while_editing, vec!["10:00", "10:30"]);
    }

    #[tokio::test]
    async fn store_failure_propagates_instead_of_reading_as_no_capacity() {
        let mut store = MockScheduleStore::new();
        store
            .expect_list_active_working_windows()
            .returning(|_| Err(SchedulingError::Store("connection refused".to_string())));

        let service = AvailabilityService::new(store);
        let result = service.available_slots(monday(), None, None).await;
        assert!(matches!(result, Err(SchedulingError::Store(_))));
    }

    #[tokio::test]
    async fn day_without_windows_is_fully_blocked_even_without_block_rows() {
        let mut store = MockScheduleStore::new();
        store
            .expect_list_active_working_windows()
            .returning(|_| Ok(vec![]));

        let service = AvailabilityService::new(store);
        assert!(service.is_date_fully_blocked(monday()).await.unwrap());
    }

    #[tokio::test]
    async fn partial_blocks_do_not_fully_block_a_date() {
        let mut store = MockScheduleStore::new();
        store
            .expect_list_active_working_windows()
            .returning(|_| Ok(vec![window("09:00", "12:00")]));
        store
            .expect_list_active_date_blocks()
            .returning(|_| Ok(vec![partial_block("09:00", "12:00")]));

        let service = AvailabilityService::new(store);
        assert!(!service.is_date_fully_blocked(monday()).await.unwrap());
    }

    #[tokio::test]
    async fn full_day_block_fully_blocks_a_date() {
        let mut store = MockScheduleStore::new();
        store
            .expect_list_active_working_windows()
            .returning(|_| Ok(vec![window("09:00", "12:00")]));
        store
            .expect_list_active_date_blocks()
            .returning(|_| Ok(vec![full_day_block()]));

        let service = AvailabilityService::new(store);
        assert!(service.is_date_fully_blocked(monday()).await.unwrap());
    }
}
