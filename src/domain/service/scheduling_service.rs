use chrono::{Datelike, Local, NaiveDate, Utc};
use serde::Serialize;

use crate::domain::config::ServiceConfig;
use crate::domain::registration::{Registration, RegistrationWithSchedule};
use crate::domain::registry::repository_trait::{RegistrationRepository, ScheduleRepository, UserRepository};
use crate::domain::schedule::monthly_quota::{MonthlyQuotaEvaluator, QuotaStatus, count_for_month};
use crate::domain::schedule::schedule_window::{ScheduleDraft, ScheduleWindow};
use crate::domain::schedule::service_type::ServiceType;
use crate::domain::schedule::slot_availability::{OccupancySummary, ShiftOccupancy, compute_occupancy};
use crate::domain::session::persistence::SessionPersistence;
use crate::domain::session::session_manager::SessionManager;
use crate::domain::session::{Principal, Session};
use crate::domain::user::User;
use crate::domain::utils::dates::month_bounds;
use crate::domain::utils::id::{AdminId, RegistrationId, ScheduleId, UserId};
use crate::domain::validation::{is_valid_name, is_valid_participant_count, is_valid_shift_count};
use crate::error::{Error, Result};

/// A schedule with the occupancy of each of its shifts.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleOverview {
    pub schedule: ScheduleWindow,
    pub shifts: Vec<ShiftOccupancy>,
    pub summary: OccupancySummary,
}

impl ScheduleOverview {
    /// The registration `user_id` holds on this schedule, if any.
    pub fn registration_of(&self, user_id: &UserId) -> Option<&Registration> {
        self.shifts.iter().flat_map(|shift| shift.registrations.iter()).find(|registration| registration.user_id == *user_id)
    }
}

/// Use cases of the volunteer calendar and the admin dashboard on top of a
/// repository.
#[derive(Debug)]
pub struct SchedulingService<R> {
    repository: R,
    config: ServiceConfig,
    quota: MonthlyQuotaEvaluator,
    /// Source of the current date for the past-schedule rule.
    today: fn() -> NaiveDate,
}

fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

impl<R> SchedulingService<R>
where
    R: ScheduleRepository + RegistrationRepository + UserRepository,
{
    pub fn new(repository: R, config: ServiceConfig) -> Self {
        let quota = MonthlyQuotaEvaluator::from_config(&config);
        SchedulingService { repository, config, quota, today: local_today }
    }

    /// Replaces the clock that decides which schedules lie in the past.
    pub fn with_clock(mut self, today: fn() -> NaiveDate) -> Self {
        self.today = today;
        self
    }

    pub fn today(&self) -> NaiveDate {
        (self.today)()
    }

    fn check_not_past(&self, schedule: &ScheduleWindow) -> Result<()> {
        if schedule.date < self.today() {
            return Err(Error::PastSchedule { schedule_id: schedule.id.clone(), date: schedule.date });
        }
        Ok(())
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Logs a volunteer in by name, creating an unapproved account on first
    /// use. Unapproved volunteers get a session but cannot register.
    pub fn login_volunteer<'s, P: SessionPersistence>(&self, sessions: &'s mut SessionManager<P>, name: &str) -> Result<&'s Session> {
        if !is_valid_name(name) {
            return Err(Error::Validation(format!("'{}' is not a valid volunteer name", name.trim())));
        }
        let user = self.repository.login_by_name(name)?;
        sessions.login(Principal::Volunteer(user))
    }

    /// Logs an administrator in by email address.
    pub fn login_admin<'s, P: SessionPersistence>(&self, sessions: &'s mut SessionManager<P>, email: &str) -> Result<&'s Session> {
        let admin = self.repository.admin_by_email(email)?.ok_or_else(|| Error::Unauthorized(format!("no administrator with email {}", email.trim())))?;
        sessions.login(Principal::Admin(admin))
    }

    /// Schedules within `from..=to` with their occupancy, ordered by date and
    /// start time.
    pub fn overview(&self, service_type: Option<ServiceType>, from: NaiveDate, to: NaiveDate) -> Result<Vec<ScheduleOverview>> {
        let schedules = self.repository.schedules_in_range(service_type, from, to)?;
        let schedule_ids: Vec<ScheduleId> = schedules.iter().map(|schedule| schedule.id.clone()).collect();
        let registrations = self.repository.registrations_for_schedules(&schedule_ids)?;

        schedules
            .into_iter()
            .map(|schedule| {
                let own: Vec<Registration> = registrations.iter().filter(|registration| registration.schedule_id == schedule.id).cloned().collect();
                Self::build_overview(schedule, &own)
            })
            .collect()
    }

    pub fn schedule_overview(&self, id: &ScheduleId) -> Result<ScheduleOverview> {
        let schedule = self.repository.schedule(id)?;
        let registrations = self.repository.registrations_for_schedules(std::slice::from_ref(id))?;
        Self::build_overview(schedule, &registrations)
    }

    fn build_overview(schedule: ScheduleWindow, registrations: &[Registration]) -> Result<ScheduleOverview> {
        let shifts = compute_occupancy(&schedule, registrations)?;
        let summary = OccupancySummary::new(&schedule, &shifts);
        Ok(ScheduleOverview { schedule, shifts, summary })
    }

    fn month_rows(&self, user_id: &UserId, year: i32, month: u32) -> Result<Vec<RegistrationWithSchedule>> {
        let (first_day, last_day) = month_bounds(year, month)?;
        self.repository.registrations_with_schedule(user_id, first_day, last_day)
    }

    /// Registrations `user_id` holds for `service_type` in the given month.
    pub fn monthly_count(&self, user_id: &UserId, service_type: ServiceType, year: i32, month: u32) -> Result<usize> {
        let rows = self.month_rows(user_id, year, month)?;
        count_for_month(user_id, service_type, year, month, &rows)
    }

    pub fn quota_status(&self, user_id: &UserId, service_type: ServiceType, year: i32, month: u32) -> Result<QuotaStatus> {
        let rows = self.month_rows(user_id, year, month)?;
        self.quota.status(user_id, service_type, year, month, &rows)
    }

    /// Registers the session's volunteer for one shift.
    ///
    /// The volunteer must be approved (checked against the stored account,
    /// not the session copy), the schedule must not lie before today, and the
    /// volunteer must not already hold a registration on it. Only then is the
    /// monthly limit for the schedule's month consulted. The capacity check
    /// and insert are one atomic claim in the repository.
    pub fn register(&self, session: &Session, schedule_id: &ScheduleId, shift_number: u32) -> Result<Registration> {
        let user = self.repository.user(&session.require_volunteer()?.id)?;
        if !user.is_approved {
            return Err(Error::NotApproved(user.id));
        }

        let schedule = self.repository.schedule(schedule_id)?;
        schedule.check_shift(shift_number)?;
        self.check_not_past(&schedule)?;

        let (year, month) = (schedule.date.year(), schedule.date.month());
        let rows = self.month_rows(&user.id, year, month)?;
        if rows.iter().any(|row| row.registration.schedule_id == *schedule_id) {
            return Err(Error::DuplicateRegistration { user_id: user.id, schedule_id: schedule_id.clone() });
        }

        if let QuotaStatus::Exhausted { limit, .. } = self.quota.status(&user.id, schedule.service_type, year, month, &rows)? {
            log::info!("User (id: {}) reached the {} limit for {} in {}.", user.id, limit, schedule.service_type, schedule.date.format("%Y-%m"));
            return Err(Error::QuotaExceeded { service_type: schedule.service_type, limit });
        }

        self.repository.claim_slot(schedule_id, &user.id, shift_number)
    }

    /// Cancels a registration. Volunteers may only cancel their own, and only
    /// while the schedule is today or later. Administrators may cancel any.
    pub fn cancel(&self, session: &Session, registration_id: &RegistrationId) -> Result<Registration> {
        let registration = self.repository.registration(registration_id)?;

        if !session.is_admin() {
            let user = session.require_volunteer()?;
            if user.id != registration.user_id {
                return Err(Error::Unauthorized(format!("registration (id: {}) belongs to another volunteer", registration_id)));
            }
            self.check_not_past(&self.repository.schedule(&registration.schedule_id)?)?;
        }

        self.repository.delete_registration(registration_id)
    }

    /// Registrations of the session's volunteer, newest first.
    pub fn my_registrations(&self, session: &Session) -> Result<Vec<RegistrationWithSchedule>> {
        let user = session.require_volunteer()?;
        self.repository.registrations_for_user(&user.id)
    }

    pub fn create_schedule(&self, session: &Session, draft: ScheduleDraft) -> Result<ScheduleWindow> {
        let admin_id = session.require_admin()?;
        let schedule = self.schedule_from_draft(ScheduleId::generate(), Some(admin_id.clone()), draft)?;
        self.repository.insert_schedule(schedule)
    }

    pub fn update_schedule(&self, session: &Session, id: &ScheduleId, draft: ScheduleDraft) -> Result<ScheduleWindow> {
        session.require_admin()?;
        let schedule = self.schedule_from_draft(id.clone(), None, draft)?;
        self.repository.replace_schedule(id, schedule)
    }

    /// Deletes a schedule and its registrations.
    pub fn delete_schedule(&self, session: &Session, id: &ScheduleId) -> Result<usize> {
        session.require_admin()?;
        self.repository.delete_schedule(id)
    }

    pub fn approve_user(&self, session: &Session, user_id: &UserId, is_approved: bool) -> Result<User> {
        session.require_admin()?;
        self.repository.set_approval(user_id, is_approved)
    }

    pub fn delete_user(&self, session: &Session, user_id: &UserId) -> Result<usize> {
        session.require_admin()?;
        self.repository.delete_user(user_id)
    }

    fn schedule_from_draft(&self, id: ScheduleId, created_by: Option<AdminId>, draft: ScheduleDraft) -> Result<ScheduleWindow> {
        if !is_valid_shift_count(draft.shift_count, &self.config) {
            return Err(Error::Validation(format!(
                "shift count {} is outside {}..={}",
                draft.shift_count,
                self.config.shift_count_range.start(),
                self.config.shift_count_range.end()
            )));
        }
        if !is_valid_participant_count(draft.participants_per_shift, &self.config) {
            return Err(Error::Validation(format!(
                "participants per shift {} is outside {}..={}",
                draft.participants_per_shift,
                self.config.participants_range.start(),
                self.config.participants_range.end()
            )));
        }

        let defaults = self.config.default_times_for(draft.date);
        let schedule = ScheduleWindow {
            id,
            service_type: draft.service_type,
            date: draft.date,
            location: draft.location.trim().to_string(),
            start_time: draft.start_time.unwrap_or(defaults.start_time),
            end_time: draft.end_time.unwrap_or(defaults.end_time),
            shift_count: draft.shift_count,
            participants_per_shift: draft.participants_per_shift,
            created_by,
            created_at: Utc::now(),
        };
        schedule.validate()?;

        Ok(schedule)
    }
}
