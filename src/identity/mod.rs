//! Role-based access for the Curo client: who is signed in, what they may open, and
//! what the screen does when they may not.
//! Keep the public surface thin and split implementation across sub-modules.

mod role;
mod session;
mod storage;
mod policy;
mod guard;

pub use role::Role;
pub use session::{Session, SessionStore};
pub use storage::{FileStorage, MemoryStorage, SessionStorage, StorageError, StoredSession};
pub use policy::{
    is_allowed, is_allowed_named, landing_route, page_endpoints, visible_nav, Access, NavEntry, NavMeta, RouteDescriptor, RouteId,
    ROUTES,
};
pub use guard::{guard, guard_named, RenderDecision, FORBIDDEN_NOTICE};
