//! The admin access decision.

use uuid::Uuid;

/// The signed-in user as seen by the gate.
#[derive(Debug, Clone)]
pub struct Principal {
    pub user_id: Uuid,
    pub email: String,
    pub active: bool,
    pub is_superuser: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Granted,
    /// Nobody (usable) is signed in: send them to the login page.
    Login,
    /// Signed in, but without the superuser role.
    Forbidden,
}

/// An inactive account counts as anonymous.
pub fn decide(principal: Option<&Principal>) -> Access {
    match principal {
        None => Access::Login,
        Some(p) if !p.active => Access::Login,
        Some(p) if !p.is_superuser => Access::Forbidden,
        Some(_) => Access::Granted,
    }
}
