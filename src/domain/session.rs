pub mod persistence;
pub mod session_manager;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::user::{Admin, User};
use crate::domain::utils::id::AdminId;
use crate::error::{Error, Result};

/// Who a session acts for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum Principal {
    Volunteer(User),
    Admin(Admin),
}

/// An authenticated session. Created by [`session_manager::SessionManager::login`]
/// and destroyed by `logout`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub principal: Principal,
    pub started_at: DateTime<Utc>,
}

impl Session {
    pub fn new(principal: Principal) -> Self {
        Session { principal, started_at: Utc::now() }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self.principal, Principal::Admin(_))
    }

    pub fn require_admin(&self) -> Result<&AdminId> {
        match &self.principal {
            Principal::Admin(admin) => Ok(&admin.id),
            Principal::Volunteer(user) => Err(Error::Unauthorized(format!("volunteer '{}' cannot administer schedules", user.name))),
        }
    }

    /// The volunteer behind this session. Approval is not checked here.
    pub fn require_volunteer(&self) -> Result<&User> {
        match &self.principal {
            Principal::Volunteer(user) => Ok(user),
            Principal::Admin(admin) => Err(Error::Unauthorized(format!("admin {} has no volunteer account", admin.email))),
        }
    }
}
