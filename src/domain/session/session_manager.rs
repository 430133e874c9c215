use crate::domain::session::persistence::SessionPersistence;
use crate::domain::session::{Principal, Session};
use crate::error::Result;

/// Owns the current session and keeps it in sync with a persistence
/// strategy.
#[derive(Debug)]
pub struct SessionManager<P: SessionPersistence> {
    persistence: P,
    current: Option<Session>,
}

impl<P: SessionPersistence> SessionManager<P> {
    /// A manager with no active session. Whatever `persistence` holds is
    /// left untouched until the next login or logout.
    pub fn new(persistence: P) -> Self {
        SessionManager { persistence, current: None }
    }

    /// A manager resuming the session `persistence` holds, if any.
    pub fn restore(persistence: P) -> Result<Self> {
        let current = persistence.load()?;
        if let Some(session) = &current {
            log::info!("Restored session started at {}.", session.started_at.to_rfc3339());
        }
        Ok(SessionManager { persistence, current })
    }

    /// Starts a new session for `principal`, replacing any current one.
    pub fn login(&mut self, principal: Principal) -> Result<&Session> {
        let session = Session::new(principal);
        self.persistence.save(&session)?;

        match &session.principal {
            Principal::Volunteer(user) => log::info!("Volunteer '{}' (id: {}) logged in.", user.name, user.id),
            Principal::Admin(admin) => log::info!("Admin {} (id: {}) logged in.", admin.email, admin.id),
        }

        let session: &Session = self.current.insert(session);
        Ok(session)
    }

    pub fn current(&self) -> Option<&Session> {
        self.current.as_ref()
    }

    pub fn is_logged_in(&self) -> bool {
        self.current.is_some()
    }

    /// Ends the current session and clears it from persistence.
    ///
    /// # Returns
    /// The session that was ended, `None` if nobody was logged in.
    pub fn logout(&mut self) -> Result<Option<Session>> {
        self.persistence.clear()?;
        let ended = self.current.take();
        if ended.is_some() {
            log::info!("Session ended.");
        }
        Ok(ended)
    }

    pub fn persistence(&self) -> &P {
        &self.persistence
    }
}
