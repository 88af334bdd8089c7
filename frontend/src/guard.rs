//! Navigation gates.
//!
//! Gate A ([`check_authenticated`]) wants a token, gate B ([`check_authorized`])
//! wants the session role inside the route's [`RoleSet`]. Both are pure; the
//! components below only turn their verdict into a redirect.

use log::{debug, info};
use yew::prelude::*;
use yew_router::prelude::*;

use crate::notice::use_notifier;
use crate::role::RoleSet;
use crate::session::{use_session, Session};
use crate::Route;

/// History state carried to `/login` so the user lands where they were going.
#[derive(Clone, Debug, PartialEq)]
pub struct ReturnTo(pub String);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Access {
    Public,
    Authenticated,
    Roles(RoleSet),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AuthGate {
    Pass,
    RedirectLogin { from: String },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoleGate {
    Pass,
    Denied,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Decision {
    Render,
    RedirectLogin { from: String },
    Deny,
}

pub fn check_authenticated(session: &Session, requested: &str) -> AuthGate {
    if session.is_authenticated() {
        AuthGate::Pass
    } else {
        AuthGate::RedirectLogin {
            from: requested.to_string(),
        }
    }
}

/// Only meaningful with a token; without one gate A has already redirected.
pub fn check_authorized(session: &Session, required: RoleSet) -> RoleGate {
    if !session.is_authenticated() || required.admits(session.role) {
        RoleGate::Pass
    } else {
        RoleGate::Denied
    }
}

/// Gate A wraps gate B.
pub fn decide(access: Access, session: &Session, requested: &str) -> Decision {
    let required = match access {
        Access::Public => return Decision::Render,
        Access::Authenticated => None,
        Access::Roles(set) => Some(set),
    };
    if let AuthGate::RedirectLogin { from } = check_authenticated(session, requested) {
        return Decision::RedirectLogin { from };
    }
    match required.map(|set| check_authorized(session, set)) {
        Some(RoleGate::Denied) => Decision::Deny,
        _ => Decision::Render,
    }
}

impl Route {
    /// Static route table: which gates guard each page.
    pub fn access(&self) -> Access {
        match self {
            Route::Login | Route::Register => Access::Public,
            Route::Dashboard | Route::PreventiveAdmin | Route::AuditLogs | Route::Boards => {
                Access::Roles(RoleSet::ADMIN)
            }
            Route::PreventiveUser => Access::Roles(RoleSet::ANY),
            Route::Root
            | Route::NotFound
            | Route::Landing
            | Route::Inventory
            | Route::InventoryAdd
            | Route::InventoryEdit { .. }
            | Route::InventoryQuantity { .. }
            | Route::Maintenance
            | Route::MaintenanceAdd
            | Route::MaintenanceEdit { .. }
            | Route::BomManagement
            | Route::Settings => Access::Authenticated,
        }
    }
}

/// Where a successful login goes: the retained path when it names a real page,
/// `/landing` otherwise.
pub fn post_login_target(from: Option<&str>) -> Route {
    match from.and_then(Route::recognize) {
        Some(Route::Login | Route::Register | Route::Root | Route::NotFound) | None => Route::Landing,
        Some(route) => route,
    }
}

/* -------------------------------------------------------------------------- */
/*                                 composants                                  */
/* -------------------------------------------------------------------------- */

#[derive(Properties, PartialEq)]
pub struct GuardProps {
    #[prop_or_default]
    pub children: Children,
}

/// Gate A.
#[function_component(RequireAuth)]
pub fn require_auth(props: &GuardProps) -> Html {
    let session = use_session();
    let navigator = use_navigator();
    let requested = use_location().map(|l| l.path().to_string()).unwrap_or_default();
    let verdict = check_authenticated(session.session(), &requested);

    {
        let verdict = verdict.clone();
        use_effect_with(verdict, move |verdict| {
            if let (AuthGate::RedirectLogin { from }, Some(nav)) = (verdict, navigator) {
                debug!("no token, {from} -> /login");
                nav.replace_with_state(&Route::Login, ReturnTo(from.clone()));
            }
            || ()
        });
    }

    match verdict {
        AuthGate::Pass => html! { for props.children.iter() },
        AuthGate::RedirectLogin { .. } => Html::default(),
    }
}

#[derive(Properties, PartialEq)]
pub struct RoleGuardProps {
    pub roles: RoleSet,
    #[prop_or_default]
    pub children: Children,
}

/// Gate B: on denial a notice is raised and the user is sent to `/landing`.
#[function_component(RequireRole)]
pub fn require_role(props: &RoleGuardProps) -> Html {
    let session = use_session();
    let notifier = use_notifier();
    let navigator = use_navigator();
    let verdict = check_authorized(session.session(), props.roles);

    use_effect_with(verdict, move |verdict| {
        if *verdict == RoleGate::Denied {
            info!("role {:?} denied", session.role());
            notifier.error("You do not have permission to access this page.");
            if let Some(nav) = navigator {
                nav.replace(&Route::Landing);
            }
        }
        || ()
    });

    match verdict {
        RoleGate::Pass => html! { for props.children.iter() },
        RoleGate::Denied => Html::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::role::Role;

    fn session(role: Option<Role>) -> Session {
        Session {
            token: Some("jwt".into()),
            role,
            user_id: Some(1),
        }
    }

    #[test]
    fn public_routes_ignore_the_session() {
        for s in [Session::default(), session(Some(Role::User))] {
            assert_eq!(decide(Route::Login.access(), &s, "/login"), Decision::Render);
            assert_eq!(decide(Route::Register.access(), &s, "/register"), Decision::Render);
        }
    }

    #[test]
    fn missing_token_redirects_and_keeps_the_path() {
        let anonymous = Session::default();
        for (route, path) in [
            (Route::Inventory, "/inventory"),
            (Route::Dashboard, "/dashboard"),
            (Route::PreventiveUser, "/preventive-maintenance/user"),
        ] {
            assert_eq!(
                decide(route.access(), &anonymous, path),
                Decision::RedirectLogin { from: path.into() }
            );
        }
    }

    #[test]
    fn empty_token_counts_as_absent() {
        let s = Session {
            token: Some(String::new()),
            role: Some(Role::Admin),
            user_id: Some(1),
        };
        assert_eq!(
            check_authenticated(&s, "/boards"),
            AuthGate::RedirectLogin { from: "/boards".into() }
        );
    }

    #[test]
    fn role_outside_the_set_is_denied() {
        let user = session(Some(Role::User));
        assert_eq!(decide(Route::Dashboard.access(), &user, "/dashboard"), Decision::Deny);
        assert_eq!(decide(Route::AuditLogs.access(), &user, "/audit-logs"), Decision::Deny);
        assert_eq!(decide(Route::Boards.access(), &user, "/boards"), Decision::Deny);
        assert_eq!(
            decide(Route::PreventiveUser.access(), &user, "/preventive-maintenance/user"),
            Decision::Render
        );
        assert_eq!(decide(Route::Settings.access(), &user, "/settings"), Decision::Render);
    }

    #[test]
    fn admin_passes_every_gate() {
        let admin = session(Some(Role::Admin));
        for route in [Route::Dashboard, Route::PreventiveAdmin, Route::PreventiveUser, Route::BomManagement] {
            assert_eq!(decide(route.access(), &admin, "/x"), Decision::Render);
        }
    }

    #[test]
    fn token_without_role_fails_role_gate_only() {
        let s = session(None);
        assert_eq!(check_authorized(&s, RoleSet::ANY), RoleGate::Denied);
        assert_eq!(decide(Route::Landing.access(), &s, "/landing"), Decision::Render);
        assert_eq!(check_authorized(&Session::default(), RoleSet::ADMIN), RoleGate::Pass);
    }

    #[test]
    fn login_returns_to_the_requested_page() {
        assert_eq!(post_login_target(Some("/boards")), Route::Boards);
        assert_eq!(
            post_login_target(Some("/inventory/edit/12")),
            Route::InventoryEdit { id: 12 }
        );
        assert_eq!(post_login_target(Some("/login")), Route::Landing);
        assert_eq!(post_login_target(None), Route::Landing);
    }
}
