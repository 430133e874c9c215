use serde::Serialize;

use crate::domain::registration::Registration;
use crate::domain::schedule::schedule_window::ScheduleWindow;
use crate::domain::schedule::shift_partitioner::ShiftWindow;
use crate::domain::utils::id::UserId;
use crate::error::Result;

/// A shift window together with the registrations that claim it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftOccupancy {
    #[serde(flatten)]
    pub window: ShiftWindow,
    pub registrations: Vec<Registration>,

    /// `participants_per_shift - registrations.len()`. Negative when the
    /// shift is over-booked; presentation treats any value `<= 0` as full.
    pub available_slots: i64,
}

impl ShiftOccupancy {
    pub fn filled_slots(&self) -> usize {
        self.registrations.len()
    }

    pub fn is_full(&self) -> bool {
        self.available_slots <= 0
    }

    pub fn is_overbooked(&self) -> bool {
        self.available_slots < 0
    }

    pub fn is_registered(&self, user_id: &UserId) -> bool {
        self.registrations.iter().any(|registration| registration.user_id == *user_id)
    }
}

/// Joins the shifts of `schedule` against `registrations`, which the caller
/// has already narrowed to this schedule.
///
/// Pure and deterministic: shifts come back in order and each keeps its
/// registrations in input order. A registration whose shift number does not
/// exist in the schedule is not attributed to any shift.
pub fn compute_occupancy(schedule: &ScheduleWindow, registrations: &[Registration]) -> Result<Vec<ShiftOccupancy>> {
    let shifts = schedule.shifts()?;

    for orphan in registrations.iter().filter(|registration| !schedule.has_shift(registration.shift_number)) {
        log::warn!(
            "Registration (id: {}) points at shift {} but schedule (id: {}) only has {} shifts.",
            orphan.id,
            orphan.shift_number,
            schedule.id,
            schedule.shift_count
        );
    }

    let occupancy = shifts
        .into_iter()
        .map(|window| {
            let shift_registrations: Vec<Registration> =
                registrations.iter().filter(|registration| registration.shift_number == window.shift_number).cloned().collect();

            let available_slots = schedule.participants_per_shift as i64 - shift_registrations.len() as i64;
            if available_slots < 0 {
                log::warn!(
                    "Shift {} of schedule (id: {}) is over capacity: {} registrations for {} slots.",
                    window.shift_number,
                    schedule.id,
                    shift_registrations.len(),
                    schedule.participants_per_shift
                );
            }

            ShiftOccupancy { window, registrations: shift_registrations, available_slots }
        })
        .collect();

    Ok(occupancy)
}

/// Totals over all shifts of one schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OccupancySummary {
    pub total_slots: u64,
    pub filled_slots: u64,
}

impl OccupancySummary {
    pub fn new(schedule: &ScheduleWindow, occupancy: &[ShiftOccupancy]) -> Self {
        OccupancySummary {
            total_slots: schedule.total_slots(),
            filled_slots: occupancy.iter().map(|shift| shift.filled_slots() as u64).sum(),
        }
    }

    /// Filled share rounded to whole percent. Exceeds 100 when over-booked.
    pub fn percentage(&self) -> u64 {
        if self.total_slots == 0 {
            return 0;
        }
        ((self.filled_slots as f64 / self.total_slots as f64) * 100.0).round() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::schedule::service_type::ServiceType;
    use crate::domain::utils::id::{RegistrationId, ScheduleId, UserId};
    use chrono::{NaiveDate, Utc};

    fn schedule(shift_count: u32, participants_per_shift: u32) -> ScheduleWindow {
        ScheduleWindow {
            id: ScheduleId::new("s-1"),
            service_type: ServiceType::Park,
            date: NaiveDate::from_ymd_opt(2024, 5, 8).unwrap(),
            location: "Central park".to_string(),
            start_time: "10:00".parse().unwrap(),
            end_time: "12:00".parse().unwrap(),
            shift_count,
            participants_per_shift,
            created_by: None,
            created_at: Utc::now(),
        }
    }

    fn registration(id: &str, user: &str, shift_number: u32) -> Registration {
        Registration {
            id: RegistrationId::new(id),
            schedule_id: ScheduleId::new("s-1"),
            user_id: UserId::new(user),
            user_name: None,
            shift_number,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn full_shift_reports_zero_available_slots() {
        let schedule = schedule(3, 2);
        let registrations = vec![registration("r-1", "u-1", 1), registration("r-2", "u-2", 1)];

        let occupancy = compute_occupancy(&schedule, &registrations).unwrap();

        assert_eq!(occupancy[0].available_slots, 0);
        assert!(occupancy[0].is_full());
        assert_eq!(occupancy[1].available_slots, 2);
        assert_eq!(occupancy[2].available_slots, 2);
    }

    #[test]
    fn overbooking_yields_negative_availability() {
        let schedule = schedule(3, 1);
        let registrations = vec![registration("r-1", "u-1", 2), registration("r-2", "u-2", 2), registration("r-3", "u-3", 2)];

        let occupancy = compute_occupancy(&schedule, &registrations).unwrap();

        assert_eq!(occupancy[1].available_slots, -2);
        assert!(occupancy[1].is_overbooked());
    }

    #[test]
    fn unknown_shift_numbers_are_not_attributed() {
        let schedule = schedule(3, 2);
        let registrations = vec![registration("r-1", "u-1", 4), registration("r-2", "u-2", 3)];

        let occupancy = compute_occupancy(&schedule, &registrations).unwrap();
        let attributed: usize = occupancy.iter().map(|shift| shift.filled_slots()).sum();

        assert_eq!(attributed, 1);
        assert!(occupancy[2].is_registered(&UserId::new("u-2")));
    }

    #[test]
    fn summary_counts_and_rounds_percentage() {
        let schedule = schedule(3, 2);
        let registrations = vec![registration("r-1", "u-1", 1)];

        let occupancy = compute_occupancy(&schedule, &registrations).unwrap();
        let summary = OccupancySummary::new(&schedule, &occupancy);

        assert_eq!(summary.total_slots, 6);
        assert_eq!(summary.filled_slots, 1);
        assert_eq!(summary.percentage(), 17);
    }
}
