use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::user_dto::{AdminDto, UserDto};
use crate::domain::utils::dates::parse_timestamp;
use crate::domain::utils::id::{AdminId, UserId};
use crate::error::{Error, Result};

/// A volunteer. New volunteers start unapproved and cannot register for
/// shifts until an administrator approves them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub is_approved: bool,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new_unapproved(name: impl Into<String>) -> Self {
        User { id: UserId::generate(), name: name.into(), is_approved: false, created_at: Utc::now() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Admin {
    pub id: AdminId,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<UserDto> for User {
    type Error = Error;

    fn try_from(dto: UserDto) -> Result<Self> {
        Ok(User { id: UserId::new(dto.id), name: dto.name, is_approved: dto.is_approved, created_at: parse_timestamp(dto.created_at.as_deref())? })
    }
}

impl From<&User> for UserDto {
    fn from(user: &User) -> Self {
        UserDto { id: user.id.to_string(), name: user.name.clone(), is_approved: user.is_approved, created_at: Some(user.created_at.to_rfc3339()) }
    }
}

impl TryFrom<AdminDto> for Admin {
    type Error = Error;

    fn try_from(dto: AdminDto) -> Result<Self> {
        Ok(Admin { id: AdminId::new(dto.id), name: dto.name, email: dto.email, created_at: parse_timestamp(dto.created_at.as_deref())? })
    }
}

impl From<&Admin> for AdminDto {
    fn from(admin: &Admin) -> Self {
        AdminDto { id: admin.id.to_string(), name: admin.name.clone(), email: admin.email.clone(), created_at: Some(admin.created_at.to_rfc3339()) }
    }
}
