//! Authentication boundary.
//!
//! The dashboard only needs a user record back: who signed in, which
//! role they hold, and which departments they may see. The directory
//! implementation checks credentials against the configured user list.

use crate::{
    config::UserDirectoryConfig,
    error::{DashError, DashResult},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "CEO")]
    Ceo,
    #[serde(rename = "department")]
    Department,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSession {
    pub username: String,
    pub role: Role,
    pub departments: Vec<String>,
}

impl UserSession {
    pub fn is_ceo(&self) -> bool {
        self.role == Role::Ceo
    }

    /// Subject of the health card: the organization for the CEO,
    /// otherwise the user's first department.
    pub fn health_subject(&self, organization_label: &str) -> String {
        match self.role {
            Role::Ceo => organization_label.to_string(),
            Role::Department => self
                .departments
                .first()
                .cloned()
                .unwrap_or_else(|| organization_label.to_string()),
        }
    }
}

pub trait Authenticator {
    fn authenticate(&self, username: &str, password: &str) -> DashResult<UserSession>;
}

/// Checks credentials against a fixed user directory with a shared password.
pub struct DirectoryAuthenticator {
    directory: UserDirectoryConfig,
}

impl DirectoryAuthenticator {
    pub fn new(directory: UserDirectoryConfig) -> Self {
        Self { directory }
    }
}

impl Authenticator for DirectoryAuthenticator {
    fn authenticate(&self, username: &str, password: &str) -> DashResult<UserSession> {
        let entry = self
            .directory
            .users
            .iter()
            .find(|u| u.username == username);

        match entry {
            Some(u) if password == self.directory.shared_password => {
                log::info!("sign-in accepted for '{username}'");
                Ok(UserSession {
                    username: u.username.clone(),
                    role: u.role,
                    departments: u.departments.clone(),
                })
            }
            _ => {
                log::warn!("sign-in rejected for '{username}'");
                Err(DashError::InvalidCredentials)
            }
        }
    }
}
