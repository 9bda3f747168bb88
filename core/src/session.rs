//! Explicit session context.
//!
//! Lifecycle: `load` on start, `sign_in` persists the user record,
//! `sign_out` clears it. Anything that needs a user calls
//! `require_user`, which fails with `NotSignedIn` (the sign-in redirect).

use crate::{
    auth::{Authenticator, UserSession},
    error::{DashError, DashResult},
    event::DashboardEvent,
    store::DashStore,
};

#[derive(Debug, Default)]
pub struct SessionContext {
    user: Option<UserSession>,
}

impl SessionContext {
    /// Restore whatever session the store holds.
    pub fn load(store: &DashStore) -> DashResult<Self> {
        let user = store.load_session()?;
        if let Some(u) = &user {
            log::debug!("restored session for '{}'", u.username);
        }
        Ok(Self { user })
    }

    pub fn sign_in(
        &mut self,
        store: &DashStore,
        auth: &dyn Authenticator,
        username: &str,
        password: &str,
    ) -> DashResult<&UserSession> {
        let user = auth.authenticate(username, password)?;
        store.save_session(&user)?;
        store.append_event(
            0,
            &DashboardEvent::SessionStarted {
                username: user.username.clone(),
                role: user.role,
            },
        )?;
        Ok(self.user.insert(user))
    }

    pub fn sign_out(&mut self, store: &DashStore) -> DashResult<()> {
        store.clear_session()?;
        if let Some(user) = self.user.take() {
            store.append_event(
                0,
                &DashboardEvent::SessionEnded {
                    username: user.username,
                },
            )?;
        }
        Ok(())
    }

    pub fn user(&self) -> Option<&UserSession> {
        self.user.as_ref()
    }

    pub fn require_user(&self) -> DashResult<&UserSession> {
        self.user.as_ref().ok_or(DashError::NotSignedIn)
    }
}
