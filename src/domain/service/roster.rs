use std::io::Write;

use crate::domain::schedule::service_type::ServiceType;
use crate::domain::service::scheduling_service::ScheduleOverview;
use crate::error::Result;

/// One volunteer on one shift, flattened for export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterEntry {
    pub date: String,
    pub service_type: ServiceType,
    pub location: String,
    pub shift_number: u32,
    pub shift_start: String,
    pub shift_end: String,
    pub volunteer: String,
}

impl RosterEntry {
    pub fn headers() -> Vec<&'static str> {
        vec!["date", "service_type", "location", "shift", "start", "end", "volunteer"]
    }

    fn to_record(&self) -> Vec<String> {
        vec![
            self.date.clone(),
            self.service_type.to_string(),
            self.location.clone(),
            self.shift_number.to_string(),
            self.shift_start.clone(),
            self.shift_end.clone(),
            self.volunteer.clone(),
        ]
    }
}

/// Flattens overviews into roster rows, in schedule then shift order.
/// Registrations without a joined user name fall back to the user id.
pub fn roster_entries(overviews: &[ScheduleOverview]) -> Vec<RosterEntry> {
    overviews
        .iter()
        .flat_map(|overview| {
            overview.shifts.iter().flat_map(move |shift| {
                shift.registrations.iter().map(move |registration| RosterEntry {
                    date: overview.schedule.date.format("%Y-%m-%d").to_string(),
                    service_type: overview.schedule.service_type,
                    location: overview.schedule.location.clone(),
                    shift_number: shift.window.shift_number,
                    shift_start: shift.window.start_time.to_string(),
                    shift_end: shift.window.end_time.to_string(),
                    volunteer: registration.user_name.clone().unwrap_or_else(|| registration.user_id.to_string()),
                })
            })
        })
        .collect()
}

/// Writes `entries` as `;`-separated CSV with a header row.
pub fn write_roster<W: Write>(entries: &[RosterEntry], writer: W) -> Result<()> {
    let mut csv_wtr = csv::WriterBuilder::new().delimiter(b';').from_writer(writer);

    csv_wtr.write_record(RosterEntry::headers())?;
    for entry in entries {
        csv_wtr.write_record(entry.to_record())?;
    }
    csv_wtr.flush()?;

    Ok(())
}
