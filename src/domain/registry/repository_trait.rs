use chrono::NaiveDate;

use crate::domain::registration::{Registration, RegistrationWithSchedule};
use crate::domain::schedule::schedule_window::ScheduleWindow;
use crate::domain::schedule::service_type::ServiceType;
use crate::domain::utils::id::{RegistrationId, ScheduleId, UserId};
use crate::domain::user::{Admin, User};
use crate::error::Result;

/// Storage of schedule windows.
///
/// Schedules are whole records: a replace swaps every field except the id,
/// and a delete cascades to the schedule's registrations.
pub trait ScheduleRepository {
    /// Schedules dated within `from..=to`, ordered by date and start time.
    ///
    /// # Arguments
    /// * `service_type` - Restricts the result to one service type; `None` returns all.
    fn schedules_in_range(&self, service_type: Option<ServiceType>, from: NaiveDate, to: NaiveDate) -> Result<Vec<ScheduleWindow>>;

    /// # Returns
    /// `Error::ScheduleNotFound` if no schedule has this id.
    fn schedule(&self, id: &ScheduleId) -> Result<ScheduleWindow>;

    /// Stores a new schedule. The schedule is validated before it is stored.
    fn insert_schedule(&self, schedule: ScheduleWindow) -> Result<ScheduleWindow>;

    /// Replaces the schedule stored under `id`. The stored record keeps `id`
    /// and its original creation data whatever `schedule` carries.
    fn replace_schedule(&self, id: &ScheduleId, schedule: ScheduleWindow) -> Result<ScheduleWindow>;

    /// Removes the schedule and every registration that points at it.
    ///
    /// # Returns
    /// The number of registrations removed with it.
    fn delete_schedule(&self, id: &ScheduleId) -> Result<usize>;
}

/// Storage of registrations.
///
/// At most one registration exists per `(user_id, schedule_id)` pair, no
/// matter which shift it claims.
pub trait RegistrationRepository {
    /// Registrations of the given schedules, each joined with its user's name.
    fn registrations_for_schedules(&self, schedule_ids: &[ScheduleId]) -> Result<Vec<Registration>>;

    /// Every registration of a user joined with its schedule's date and
    /// service type, newest first.
    fn registrations_for_user(&self, user_id: &UserId) -> Result<Vec<RegistrationWithSchedule>>;

    /// Like [`Self::registrations_for_user`], limited to schedules dated
    /// within `from..=to`.
    fn registrations_with_schedule(&self, user_id: &UserId, from: NaiveDate, to: NaiveDate) -> Result<Vec<RegistrationWithSchedule>>;

    fn registration(&self, id: &RegistrationId) -> Result<Registration>;

    /// Stores a registration without looking at shift capacity.
    ///
    /// # Returns
    /// `Error::DuplicateRegistration` if the user already holds a registration
    /// for the schedule, `Error::InvalidShiftNumber` if the schedule has no
    /// such shift.
    fn insert_registration(&self, schedule_id: &ScheduleId, user_id: &UserId, shift_number: u32) -> Result<Registration>;

    /// Stores a registration only if its shift still has a free slot. The
    /// capacity check and the insert happen as one step, so two concurrent
    /// claims can never both take the last slot.
    ///
    /// # Returns
    /// `Error::ShiftFull` if the shift is already at capacity, otherwise the
    /// same errors as [`Self::insert_registration`].
    fn claim_slot(&self, schedule_id: &ScheduleId, user_id: &UserId, shift_number: u32) -> Result<Registration>;

    fn delete_registration(&self, id: &RegistrationId) -> Result<Registration>;
}

/// Storage of volunteers and administrators.
pub trait UserRepository {
    /// Finds the volunteer with this (trimmed) name, creating an unapproved
    /// one on first login.
    fn login_by_name(&self, name: &str) -> Result<User>;

    /// All volunteers, newest first.
    fn users(&self) -> Result<Vec<User>>;

    /// Approved volunteers ordered by name.
    fn approved_users(&self) -> Result<Vec<User>>;

    fn user(&self, id: &UserId) -> Result<User>;

    fn set_approval(&self, id: &UserId, is_approved: bool) -> Result<User>;

    /// Removes the user and every registration the user holds.
    ///
    /// # Returns
    /// The number of registrations removed with the user.
    fn delete_user(&self, id: &UserId) -> Result<usize>;

    fn admin_by_email(&self, email: &str) -> Result<Option<Admin>>;

    fn insert_admin(&self, admin: Admin) -> Result<Admin>;
}
