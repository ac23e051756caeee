//! Route access policy: the one table that says which role may open which screen.
//!
//! Everything is derived from `ROUTES`. Navigation entries are the rows that carry a
//! `NavMeta`, in declaration order, filtered by the same check the guard uses, so the
//! menu never offers a link the guard would refuse.

use super::role::Role;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteId {
    Home,
    Login,
    Register,
    Dashboard,
    Doctor,
    Patient,
    Appointment,
    Department,
    Test,
    Service,
    Medicine,
    Prescription,
    Request,
    EditProfile,
    CreateAppointment,
    CreatePatient,
    EditPatient,
    EditDoctor,
    EditDepartment,
    CreateMedicine,
    EditMedicine,
    EditTest,
    EditService,
    CreatePrescription,
    ViewPrescription,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Reachable without a session.
    Public,
    Roles(&'static [Role]),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavMeta {
    pub label: &'static str,
    pub icon: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteDescriptor {
    pub id: RouteId,
    pub name: &'static str,
    /// `:id` segments match any single path segment.
    pub path: &'static str,
    pub access: Access,
    pub nav: Option<NavMeta>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavEntry {
    pub route: RouteId,
    pub path: &'static str,
    pub label: &'static str,
    pub icon: &'static str,
}

const ADMIN: &[Role] = &[Role::Admin];
const DOCTOR: &[Role] = &[Role::Doctor];
const ADMIN_DOCTOR: &[Role] = &[Role::Admin, Role::Doctor];
const CARE: &[Role] = &[Role::Doctor, Role::Patient];
const SIGNED_IN: &[Role] = &[Role::Admin, Role::Doctor, Role::Patient];

const fn nav(label: &'static str, icon: &'static str) -> Option<NavMeta> { Some(NavMeta { label, icon }) }

const fn route(id: RouteId, name: &'static str, path: &'static str, access: Access, nav: Option<NavMeta>) -> RouteDescriptor {
    RouteDescriptor { id, name, path, access, nav }
}

/// Menu order is the declaration order of the rows with a `nav` entry.
pub static ROUTES: &[RouteDescriptor] = &[
    route(RouteId::Home, "home", "/", Access::Public, None),
    route(RouteId::Login, "login", "/login", Access::Public, None),
    route(RouteId::Register, "register", "/register", Access::Public, None),
    route(RouteId::Dashboard, "dashboard", "/dashboard", Access::Roles(SIGNED_IN), nav("Dashboard", "house")),
    route(RouteId::Doctor, "doctor", "/doctor", Access::Roles(ADMIN), nav("Doctors", "user-doctor")),
    route(RouteId::Patient, "patient", "/patient", Access::Roles(ADMIN), nav("Patients", "user")),
    route(RouteId::Appointment, "appointment", "/appointment", Access::Roles(ADMIN_DOCTOR), nav("Appointments", "calendar")),
    route(RouteId::Department, "department", "/department", Access::Roles(ADMIN), nav("Departments", "building")),
    route(RouteId::Test, "test", "/test", Access::Roles(ADMIN), nav("Tests", "flask")),
    route(RouteId::Service, "service", "/service", Access::Roles(ADMIN), nav("Services", "briefcase")),
    route(RouteId::Medicine, "medicine", "/medicine", Access::Roles(ADMIN), nav("Medicines", "pills")),
    route(RouteId::Prescription, "prescription", "/prescription", Access::Roles(CARE), nav("Prescriptions", "file-prescription")),
    route(RouteId::Request, "request", "/request", Access::Roles(ADMIN), nav("Requests", "envelope")),
    route(RouteId::EditProfile, "edit-profile", "/edit-profile", Access::Roles(SIGNED_IN), None),
    route(RouteId::CreateAppointment, "create-appointment", "/create-appointment", Access::Roles(ADMIN), None),
    route(RouteId::CreatePatient, "create-patient", "/create-patient", Access::Roles(ADMIN), None),
    route(RouteId::EditPatient, "edit-patient", "/edit-patient/:id", Access::Roles(ADMIN), None),
    route(RouteId::EditDoctor, "edit-doctor", "/edit-doctor/:id", Access::Roles(ADMIN), None),
    route(RouteId::EditDepartment, "edit-department", "/edit-department/:id", Access::Roles(ADMIN), None),
    route(RouteId::CreateMedicine, "create-medicine", "/create-medicine", Access::Roles(ADMIN), None),
    route(RouteId::EditMedicine, "edit-medicine", "/edit-medicine/:id", Access::Roles(ADMIN), None),
    route(RouteId::EditTest, "edit-test", "/edit-test/:id", Access::Roles(ADMIN), None),
    route(RouteId::EditService, "edit-service", "/edit-service/:id", Access::Roles(ADMIN), None),
    route(RouteId::CreatePrescription, "create-prescription", "/create-prescription", Access::Roles(DOCTOR), None),
    route(RouteId::ViewPrescription, "view-prescription", "/view-prescription/:id", Access::Roles(CARE), None),
];

impl RouteId {
    pub fn descriptor(self) -> Option<&'static RouteDescriptor> {
        ROUTES.iter().find(|d| d.id == self)
    }

    pub fn name(self) -> &'static str {
        self.descriptor().map(|d| d.name).unwrap_or("unknown")
    }

    pub fn path(self) -> &'static str {
        self.descriptor().map(|d| d.path).unwrap_or("/")
    }

    pub fn is_public(self) -> bool {
        matches!(self.descriptor().map(|d| d.access), Some(Access::Public))
    }

    /// Resolve by route name (`doctor`) or by path (`/edit-doctor/12`).
    pub fn parse(s: &str) -> Option<RouteId> {
        let s = s.trim();
        if s.starts_with('/') { return Self::from_path(s); }
        ROUTES.iter().find(|d| d.name == s).map(|d| d.id)
    }

    pub fn from_path(path: &str) -> Option<RouteId> {
        let path = path.split(['?', '#']).next().unwrap_or("");
        let segs: Vec<&str> = path.split('/').filter(|p| !p.is_empty()).collect();
        ROUTES.iter().find(|d| path_matches(d.path, &segs)).map(|d| d.id)
    }
}

fn path_matches(pattern: &str, segs: &[&str]) -> bool {
    let pat: Vec<&str> = pattern.split('/').filter(|p| !p.is_empty()).collect();
    pat.len() == segs.len()
        && pat.iter().zip(segs).all(|(p, s)| p.starts_with(':') || p == s)
}

/// True iff the route exists and the role is in its allowed set. Public routes are
/// open to every role, including `Role::None`; every other route is closed to it.
pub fn is_allowed(role: Role, route: RouteId) -> bool {
    match route.descriptor().map(|d| d.access) {
        Some(Access::Public) => true,
        Some(Access::Roles(roles)) => role.is_signed_in() && roles.contains(&role),
        None => false,
    }
}

/// String form for callers holding raw route names or paths. Unknown routes are denied.
pub fn is_allowed_named(role: Role, route: &str) -> bool {
    RouteId::parse(route).map(|id| is_allowed(role, id)).unwrap_or(false)
}

pub fn visible_nav(role: Role) -> Vec<NavEntry> {
    ROUTES
        .iter()
        .filter(|d| is_allowed(role, d.id))
        .filter_map(|d| d.nav.map(|n| NavEntry { route: d.id, path: d.path, label: n.label, icon: n.icon }))
        .collect()
}

/// Where a successful login lands. Unknown roles go back to the login screen.
pub fn landing_route(role: Role) -> RouteId {
    match role {
        Role::Admin => RouteId::Dashboard,
        Role::Doctor => RouteId::Appointment,
        Role::Patient => RouteId::Prescription,
        Role::None => RouteId::Login,
    }
}

/// Backend reads a page issues when it opens, per role. Empty when the role may not
/// open the page or the page loads nothing up front (forms, `:id` screens).
pub fn page_endpoints(role: Role, route: RouteId) -> &'static [&'static str] {
    if !is_allowed(role, route) {
        return &[];
    }
    match (route, role) {
        (RouteId::Dashboard, Role::Admin) => &["/user/count"],
        (RouteId::Dashboard, Role::Doctor) => &["/list/appointment/doctor", "/list/doctor/prescription"],
        (RouteId::Dashboard, _) => &["/list/patient/prescription"],
        (RouteId::Doctor, _) => &["/doctor/read"],
        (RouteId::Department, _) => &["/department/read"],
        (RouteId::Appointment, Role::Admin) => &["/appointment/read"],
        (RouteId::Appointment, _) => &["/list/appointment/doctor"],
        (RouteId::Prescription, Role::Doctor) => &["/list/doctor/prescription"],
        (RouteId::Prescription, _) => &["/list/patient/prescription"],
        (RouteId::EditProfile, _) => &["/user"],
        _ => &[],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_route_id_has_exactly_one_row() {
        for d in ROUTES {
            assert_eq!(ROUTES.iter().filter(|o| o.id == d.id).count(), 1, "{:?}", d.id);
            assert_eq!(ROUTES.iter().filter(|o| o.name == d.name).count(), 1, "{}", d.name);
        }
    }

    #[test]
    fn parse_by_name_and_path() {
        assert_eq!(RouteId::parse("dashboard"), Some(RouteId::Dashboard));
        assert_eq!(RouteId::parse("/department"), Some(RouteId::Department));
        assert_eq!(RouteId::parse("/department/"), Some(RouteId::Department));
        assert_eq!(RouteId::parse("/"), Some(RouteId::Home));
        assert_eq!(RouteId::parse("/edit-doctor/42"), Some(RouteId::EditDoctor));
        assert_eq!(RouteId::parse("/view-prescription/9?tab=tests"), Some(RouteId::ViewPrescription));
        assert_eq!(RouteId::parse("/edit-doctor"), None);
        assert_eq!(RouteId::parse("settings"), None);
        assert_eq!(RouteId::parse("Dashboard"), None);
    }

    #[test]
    fn unknown_routes_fail_closed() {
        assert!(!is_allowed_named(Role::Admin, "settings"));
        assert!(!is_allowed_named(Role::Admin, "/admin/secret"));
        assert!(is_allowed_named(Role::Admin, "/doctor"));
    }

    #[test]
    fn page_endpoints_follow_role() {
        assert_eq!(page_endpoints(Role::Admin, RouteId::Appointment), ["/appointment/read"]);
        assert_eq!(page_endpoints(Role::Doctor, RouteId::Appointment), ["/list/appointment/doctor"]);
        assert_eq!(page_endpoints(Role::Doctor, RouteId::Dashboard).len(), 2);
        assert_eq!(page_endpoints(Role::Patient, RouteId::Prescription), ["/list/patient/prescription"]);
        assert!(page_endpoints(Role::Patient, RouteId::Doctor).is_empty());
        assert!(page_endpoints(Role::None, RouteId::Dashboard).is_empty());
        assert!(page_endpoints(Role::Admin, RouteId::EditDoctor).is_empty());
        assert_eq!(RouteId::EditDoctor.name(), "edit-doctor");
    }

    #[test]
    fn nav_paths_come_from_table() {
        let nav = visible_nav(Role::Doctor);
        assert_eq!(nav[0].path, "/dashboard");
        assert_eq!(nav[0].icon, "house");
    }
}
