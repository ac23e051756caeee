use super::policy::{is_allowed, RouteId};
use super::session::Session;
use crate::error::{AppError, AppResult};

/// Literal notice shown in place of a page the role may not open.
pub const FORBIDDEN_NOTICE: &str = "You don't have access to this page";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderDecision {
    Allow,
    RedirectToLogin,
    Forbidden,
}

impl RenderDecision {
    pub fn notice(&self) -> Option<&'static str> {
        match self {
            RenderDecision::Forbidden => Some(FORBIDDEN_NOTICE),
            _ => None,
        }
    }

    pub fn redirect_target(&self) -> Option<RouteId> {
        match self {
            RenderDecision::RedirectToLogin => Some(RouteId::Login),
            _ => None,
        }
    }

    /// Fold the decision into the shared error taxonomy.
    pub fn into_result(self) -> AppResult<()> {
        match self {
            RenderDecision::Allow => Ok(()),
            RenderDecision::RedirectToLogin => Err(AppError::unauthenticated()),
            RenderDecision::Forbidden => Err(AppError::forbidden()),
        }
    }
}

/// Decide what to render for `route`. Pure; the caller performs the redirect or
/// renders the notice.
pub fn guard(session: &Session, route: RouteId) -> RenderDecision {
    if route.is_public() {
        return RenderDecision::Allow;
    }
    if !session.is_authenticated() {
        return RenderDecision::RedirectToLogin;
    }
    if is_allowed(session.role(), route) {
        RenderDecision::Allow
    } else {
        RenderDecision::Forbidden
    }
}

/// Same as `guard` for a raw route name or path; unknown routes are never allowed.
pub fn guard_named(session: &Session, route: &str) -> RenderDecision {
    match RouteId::parse(route) {
        Some(id) => guard(session, id),
        None if session.is_authenticated() => RenderDecision::Forbidden,
        None => RenderDecision::RedirectToLogin,
    }
}
