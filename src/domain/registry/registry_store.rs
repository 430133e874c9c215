use chrono::NaiveDate;
use slotmap::{SlotMap, new_key_type};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::api::registry_dto::RegistryDto;
use crate::domain::registration::{Registration, RegistrationWithSchedule};
use crate::domain::registry::repository_trait::{RegistrationRepository, ScheduleRepository, UserRepository};
use crate::domain::schedule::schedule_window::ScheduleWindow;
use crate::domain::schedule::service_type::ServiceType;
use crate::domain::user::{Admin, User};
use crate::domain::utils::id::{RegistrationId, ScheduleId, UserId};
use crate::error::{Error, Result};

new_key_type! {
    pub struct ScheduleKey;
    pub struct RegistrationKey;
    pub struct UserKey;
}

#[derive(Debug, Default)]
struct RegistryInner {
    schedules: SlotMap<ScheduleKey, ScheduleWindow>,
    /// Index lookup of the internal key using the public schedule id.
    schedule_index: HashMap<ScheduleId, ScheduleKey>,

    registrations: SlotMap<RegistrationKey, Registration>,
    registration_index: HashMap<RegistrationId, RegistrationKey>,

    users: SlotMap<UserKey, User>,
    user_index: HashMap<UserId, UserKey>,

    admins: Vec<Admin>,
}

impl RegistryInner {
    fn schedule(&self, id: &ScheduleId) -> Result<&ScheduleWindow> {
        self.schedule_index.get(id).and_then(|key| self.schedules.get(*key)).ok_or_else(|| Error::ScheduleNotFound(id.clone()))
    }

    fn user(&self, id: &UserId) -> Result<&User> {
        self.user_index.get(id).and_then(|key| self.users.get(*key)).ok_or_else(|| Error::UserNotFound(id.clone()))
    }

    /// Copy of `registration` joined with its user's name.
    fn joined(&self, registration: &Registration) -> Registration {
        let mut joined = registration.clone();
        joined.user_name = self.user(&registration.user_id).ok().map(|user| user.name.clone());
        joined
    }

    fn holds_registration(&self, user_id: &UserId, schedule_id: &ScheduleId) -> bool {
        self.registrations.values().any(|registration| registration.user_id == *user_id && registration.schedule_id == *schedule_id)
    }

    fn shift_load(&self, schedule_id: &ScheduleId, shift_number: u32) -> usize {
        self.registrations
            .values()
            .filter(|registration| registration.schedule_id == *schedule_id && registration.shift_number == shift_number)
            .count()
    }

    fn insert_schedule(&mut self, schedule: ScheduleWindow) -> Result<ScheduleWindow> {
        schedule.validate()?;
        if self.schedule_index.contains_key(&schedule.id) {
            return Err(Error::Validation(format!("schedule id {} is already in use", schedule.id)));
        }

        let id = schedule.id.clone();
        let key = self.schedules.insert(schedule.clone());
        self.schedule_index.insert(id, key);

        Ok(schedule)
    }

    fn insert_user(&mut self, user: User) -> Result<User> {
        if self.user_index.contains_key(&user.id) {
            return Err(Error::Validation(format!("user id {} is already in use", user.id)));
        }
        if self.users.values().any(|existing| existing.name == user.name) {
            return Err(Error::Validation(format!("user name '{}' is already taken", user.name)));
        }

        let id = user.id.clone();
        let key = self.users.insert(user.clone());
        self.user_index.insert(id, key);

        Ok(user)
    }

    fn insert_admin(&mut self, admin: Admin) -> Result<Admin> {
        if self.admins.iter().any(|existing| existing.id == admin.id || existing.email.eq_ignore_ascii_case(&admin.email)) {
            return Err(Error::Validation(format!("admin {} ({}) already exists", admin.id, admin.email)));
        }
        self.admins.push(admin.clone());
        Ok(admin)
    }

    /// Checks references and the one-registration-per-schedule rule, then
    /// stores. Capacity is the caller's concern.
    fn insert_registration(&mut self, mut registration: Registration) -> Result<Registration> {
        self.schedule(&registration.schedule_id)?.check_shift(registration.shift_number)?;
        self.user(&registration.user_id)?;

        if self.registration_index.contains_key(&registration.id) {
            return Err(Error::Validation(format!("registration id {} is already in use", registration.id)));
        }
        if self.holds_registration(&registration.user_id, &registration.schedule_id) {
            return Err(Error::DuplicateRegistration { user_id: registration.user_id, schedule_id: registration.schedule_id });
        }

        registration.user_name = None;
        let id = registration.id.clone();
        let key = self.registrations.insert(registration.clone());
        self.registration_index.insert(id, key);

        Ok(self.joined(&registration))
    }

    /// Registrations of `user_id` whose schedule passes `keep`, joined with
    /// their schedule and ordered newest first.
    fn rows_of_user(&self, user_id: &UserId, keep: impl Fn(&ScheduleWindow) -> bool) -> Result<Vec<RegistrationWithSchedule>> {
        let mut rows = Vec::new();
        for registration in self.registrations.values().filter(|registration| registration.user_id == *user_id) {
            let schedule = self.schedule(&registration.schedule_id)?;
            if keep(schedule) {
                rows.push(RegistrationWithSchedule { registration: self.joined(registration), schedule_date: schedule.date, service_type: schedule.service_type });
            }
        }
        rows.sort_by(|a, b| (b.registration.created_at, &b.registration.id).cmp(&(a.registration.created_at, &a.registration.id)));
        Ok(rows)
    }

    /// Removes every registration matching `predicate` and returns how many
    /// went away.
    fn remove_registrations_where(&mut self, predicate: impl Fn(&Registration) -> bool) -> usize {
        let keys: Vec<RegistrationKey> = self.registrations.iter().filter(|(_, registration)| predicate(registration)).map(|(key, _)| key).collect();

        for key in &keys {
            if let Some(registration) = self.registrations.remove(*key) {
                self.registration_index.remove(&registration.id);
            }
        }
        keys.len()
    }
}

/// In-memory store of every schedule, registration and account.
///
/// Cloning a `Registry` yields another handle to the same data; all maps are
/// protected by one lock so multi-record checks see a consistent state.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    inner: Arc<RwLock<RegistryInner>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    // A panic while holding the lock leaves the maps consistent because every
    // mutation validates before it writes.
    fn read(&self) -> RwLockReadGuard<'_, RegistryInner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, RegistryInner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Builds a registry from a stored snapshot.
    ///
    /// Records are loaded in dependency order (accounts, schedules, then
    /// registrations) so every reference is checked. Stored registrations may
    /// exceed shift capacity; that is reported when occupancy is computed.
    pub fn from_dto(dto: RegistryDto) -> Result<Self> {
        let registry = Registry::new();
        {
            let mut inner = registry.write();

            for admin_dto in dto.admins {
                inner.insert_admin(Admin::try_from(admin_dto)?)?;
            }
            for user_dto in dto.users {
                inner.insert_user(User::try_from(user_dto)?)?;
            }
            for schedule_dto in dto.schedules {
                inner.insert_schedule(ScheduleWindow::try_from(schedule_dto)?)?;
            }
            for registration_dto in dto.registrations {
                inner.insert_registration(Registration::try_from(registration_dto)?)?;
            }

            log::info!(
                "Registry loaded: {} admins, {} users, {} schedules, {} registrations.",
                inner.admins.len(),
                inner.users.len(),
                inner.schedules.len(),
                inner.registrations.len()
            );
        }
        Ok(registry)
    }

    /// Snapshot of the current state, ordered deterministically.
    pub fn to_dto(&self) -> RegistryDto {
        let inner = self.read();

        let mut users: Vec<&User> = inner.users.values().collect();
        users.sort_by(|a, b| (a.created_at, &a.id).cmp(&(b.created_at, &b.id)));

        let mut schedules: Vec<&ScheduleWindow> = inner.schedules.values().collect();
        schedules.sort_by(|a, b| (a.date, a.start_time, &a.id).cmp(&(b.date, b.start_time, &b.id)));

        let mut registrations: Vec<&Registration> = inner.registrations.values().collect();
        registrations.sort_by(|a, b| (a.created_at, &a.id).cmp(&(b.created_at, &b.id)));

        RegistryDto {
            admins: inner.admins.iter().map(Into::into).collect(),
            users: users.into_iter().map(Into::into).collect(),
            schedules: schedules.into_iter().map(Into::into).collect(),
            registrations: registrations.into_iter().map(Into::into).collect(),
        }
    }

    pub fn schedule_count(&self) -> usize {
        self.read().schedules.len()
    }

    pub fn registration_count(&self) -> usize {
        self.read().registrations.len()
    }
}

impl ScheduleRepository for Registry {
    fn schedules_in_range(&self, service_type: Option<ServiceType>, from: NaiveDate, to: NaiveDate) -> Result<Vec<ScheduleWindow>> {
        let inner = self.read();
        let mut schedules: Vec<ScheduleWindow> = inner
            .schedules
            .values()
            .filter(|schedule| (from..=to).contains(&schedule.date))
            .filter(|schedule| service_type.is_none_or(|wanted| schedule.service_type == wanted))
            .cloned()
            .collect();
        schedules.sort_by(|a, b| (a.date, a.start_time, &a.id).cmp(&(b.date, b.start_time, &b.id)));
        Ok(schedules)
    }

    fn schedule(&self, id: &ScheduleId) -> Result<ScheduleWindow> {
        self.read().schedule(id).cloned()
    }

    fn insert_schedule(&self, schedule: ScheduleWindow) -> Result<ScheduleWindow> {
        let stored = self.write().insert_schedule(schedule)?;
        log::info!("Schedule (id: {}) created for {} on {}.", stored.id, stored.service_type, stored.date);
        Ok(stored)
    }

    fn replace_schedule(&self, id: &ScheduleId, mut schedule: ScheduleWindow) -> Result<ScheduleWindow> {
        let mut inner = self.write();

        let key = *inner.schedule_index.get(id).ok_or_else(|| Error::ScheduleNotFound(id.clone()))?;
        let previous = inner.schedules.get(key).ok_or_else(|| Error::ScheduleNotFound(id.clone()))?;
        schedule.id = id.clone();
        schedule.created_by = previous.created_by.clone();
        schedule.created_at = previous.created_at;
        schedule.validate()?;

        let stranded = inner
            .registrations
            .values()
            .filter(|registration| registration.schedule_id == *id && !schedule.has_shift(registration.shift_number))
            .count();
        if stranded > 0 {
            log::warn!("Schedule (id: {}) now has {} shifts; {} registrations point past the last shift.", id, schedule.shift_count, stranded);
        }

        if let Some(slot) = inner.schedules.get_mut(key) {
            *slot = schedule.clone();
        }
        log::info!("Schedule (id: {}) replaced.", id);

        Ok(schedule)
    }

    fn delete_schedule(&self, id: &ScheduleId) -> Result<usize> {
        let mut inner = self.write();

        let key = inner.schedule_index.remove(id).ok_or_else(|| Error::ScheduleNotFound(id.clone()))?;
        inner.schedules.remove(key);
        let removed = inner.remove_registrations_where(|registration| registration.schedule_id == *id);

        log::info!("Schedule (id: {}) deleted together with {} registrations.", id, removed);
        Ok(removed)
    }
}

impl RegistrationRepository for Registry {
    fn registrations_for_schedules(&self, schedule_ids: &[ScheduleId]) -> Result<Vec<Registration>> {
        let inner = self.read();
        let wanted: HashSet<&ScheduleId> = schedule_ids.iter().collect();

        let mut registrations: Vec<Registration> =
            inner.registrations.values().filter(|registration| wanted.contains(&registration.schedule_id)).map(|registration| inner.joined(registration)).collect();
        registrations.sort_by(|a, b| (a.created_at, &a.id).cmp(&(b.created_at, &b.id)));

        Ok(registrations)
    }

    fn registrations_for_user(&self, user_id: &UserId) -> Result<Vec<RegistrationWithSchedule>> {
        self.read().rows_of_user(user_id, |_| true)
    }

    fn registrations_with_schedule(&self, user_id: &UserId, from: NaiveDate, to: NaiveDate) -> Result<Vec<RegistrationWithSchedule>> {
        self.read().rows_of_user(user_id, |schedule| (from..=to).contains(&schedule.date))
    }

    fn registration(&self, id: &RegistrationId) -> Result<Registration> {
        let inner = self.read();
        inner
            .registration_index
            .get(id)
            .and_then(|key| inner.registrations.get(*key))
            .map(|registration| inner.joined(registration))
            .ok_or_else(|| Error::RegistrationNotFound(id.clone()))
    }

    fn insert_registration(&self, schedule_id: &ScheduleId, user_id: &UserId, shift_number: u32) -> Result<Registration> {
        let stored = self.write().insert_registration(Registration::new(schedule_id.clone(), user_id.clone(), shift_number))?;
        log::info!("Registration (id: {}) stored for shift {} of schedule (id: {}).", stored.id, stored.shift_number, stored.schedule_id);
        Ok(stored)
    }

    fn claim_slot(&self, schedule_id: &ScheduleId, user_id: &UserId, shift_number: u32) -> Result<Registration> {
        let mut inner = self.write();

        let capacity = inner.schedule(schedule_id)?.participants_per_shift as usize;
        if inner.shift_load(schedule_id, shift_number) >= capacity {
            log::warn!("Claim on shift {} of schedule (id: {}) rejected: shift is full.", shift_number, schedule_id);
            return Err(Error::ShiftFull { schedule_id: schedule_id.clone(), shift_number });
        }

        let stored = inner.insert_registration(Registration::new(schedule_id.clone(), user_id.clone(), shift_number))?;
        log::info!("User (id: {}) claimed shift {} of schedule (id: {}).", stored.user_id, stored.shift_number, stored.schedule_id);
        Ok(stored)
    }

    fn delete_registration(&self, id: &RegistrationId) -> Result<Registration> {
        let mut inner = self.write();

        let key = inner.registration_index.remove(id).ok_or_else(|| Error::RegistrationNotFound(id.clone()))?;
        let registration = inner.registrations.remove(key).ok_or_else(|| Error::RegistrationNotFound(id.clone()))?;

        log::info!("Registration (id: {}) cancelled.", id);
        Ok(inner.joined(&registration))
    }
}

impl UserRepository for Registry {
    fn login_by_name(&self, name: &str) -> Result<User> {
        let name = name.trim();
        let mut inner = self.write();

        if let Some(user) = inner.users.values().find(|user| user.name == name) {
            return Ok(user.clone());
        }

        let user = inner.insert_user(User::new_unapproved(name))?;
        log::info!("First login of '{}': created unapproved user (id: {}).", user.name, user.id);
        Ok(user)
    }

    fn users(&self) -> Result<Vec<User>> {
        let inner = self.read();
        let mut users: Vec<User> = inner.users.values().cloned().collect();
        users.sort_by(|a, b| (b.created_at, &b.id).cmp(&(a.created_at, &a.id)));
        Ok(users)
    }

    fn approved_users(&self) -> Result<Vec<User>> {
        let inner = self.read();
        let mut users: Vec<User> = inner.users.values().filter(|user| user.is_approved).cloned().collect();
        users.sort_by(|a, b| (&a.name, &a.id).cmp(&(&b.name, &b.id)));
        Ok(users)
    }

    fn user(&self, id: &UserId) -> Result<User> {
        self.read().user(id).cloned()
    }

    fn set_approval(&self, id: &UserId, is_approved: bool) -> Result<User> {
        let mut inner = self.write();

        let key = *inner.user_index.get(id).ok_or_else(|| Error::UserNotFound(id.clone()))?;
        let user = inner.users.get_mut(key).ok_or_else(|| Error::UserNotFound(id.clone()))?;
        user.is_approved = is_approved;

        log::info!("User (id: {}) approval set to {}.", id, is_approved);
        Ok(user.clone())
    }

    fn delete_user(&self, id: &UserId) -> Result<usize> {
        let mut inner = self.write();

        let key = inner.user_index.remove(id).ok_or_else(|| Error::UserNotFound(id.clone()))?;
        inner.users.remove(key);
        let removed = inner.remove_registrations_where(|registration| registration.user_id == *id);

        log::info!("User (id: {}) deleted together with {} registrations.", id, removed);
        Ok(removed)
    }

    fn admin_by_email(&self, email: &str) -> Result<Option<Admin>> {
        let email = email.trim();
        Ok(self.read().admins.iter().find(|admin| admin.email.eq_ignore_ascii_case(email)).cloned())
    }

    fn insert_admin(&self, admin: Admin) -> Result<Admin> {
        let stored = self.write().insert_admin(admin)?;
        log::info!("Admin {} (id: {}) created.", stored.email, stored.id);
        Ok(stored)
    }
}
