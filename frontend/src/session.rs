//! Session store (token / role / user id) and the context that injects it.
//!
//! The store is the single source of truth for "who is logged in". It is
//! persisted through a [`SessionStorage`] so a reload keeps the user signed in,
//! and it is read at request time by [`crate::api::Api`], which means a cleared
//! session is visible to the very next request.

use std::cell::RefCell;
use std::rc::Rc;

use log::{debug, info, warn};
use yew::prelude::*;
use yew_router::prelude::*;

use crate::api::{Api, ApiClient, ApiError, TokenSource};
use crate::auth::{complete_login, LoginResponse};
use crate::config::{API_BASE_URL, ROLE_KEY, TOKEN_KEY, USER_ID_KEY};
use crate::role::Role;
use crate::Route;

/* ---------------- structure session ---------------- */

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Session {
    pub token: Option<String>,
    pub role: Option<Role>,
    pub user_id: Option<i64>,
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        self.token.as_deref().is_some_and(|t| !t.is_empty())
    }
}

/* ---------------- persistence ---------------------- */

/// Key/value persistence behind the store (browser local storage in the app).
pub trait SessionStorage {
    fn read(&self, key: &str) -> Option<String>;
    fn write(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

/// `window.localStorage`.
pub struct BrowserStorage;

impl BrowserStorage {
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok()?
    }
}

impl SessionStorage for BrowserStorage {
    fn read(&self, key: &str) -> Option<String> {
        Self::storage()?.get_item(key).ok()?
    }

    fn write(&self, key: &str, value: &str) {
        match Self::storage() {
            Some(s) => {
                if s.set_item(key, value).is_err() {
                    warn!("localStorage: cannot write `{key}`");
                }
            }
            None => warn!("localStorage unavailable, `{key}` not persisted"),
        }
    }

    fn remove(&self, key: &str) {
        if let Some(s) = Self::storage() {
            let _ = s.remove_item(key);
        }
    }
}

pub struct SessionStore<S: SessionStorage> {
    storage: S,
    current: RefCell<Session>,
}

impl<S: SessionStorage> SessionStore<S> {
    /// Rebuilds the session from storage. A stored token is trusted as-is.
    pub fn load(storage: S) -> Self {
        let token = storage.read(TOKEN_KEY).filter(|t| !t.is_empty());
        let role = storage.read(ROLE_KEY).and_then(|r| r.parse::<Role>().ok());
        let user_id = storage.read(USER_ID_KEY).and_then(|id| id.trim().parse().ok());
        let session = Session { token, role, user_id };
        debug!("session restored: authenticated={}", session.is_authenticated());
        Self {
            storage,
            current: RefCell::new(session),
        }
    }

    pub fn session(&self) -> Session {
        self.current.borrow().clone()
    }

    pub fn set_session(&self, token: String, role: Role, user_id: i64) -> Session {
        self.storage.write(TOKEN_KEY, &token);
        self.storage.write(ROLE_KEY, role.as_str());
        self.storage.write(USER_ID_KEY, &user_id.to_string());
        let session = Session {
            token: Some(token),
            role: Some(role),
            user_id: Some(user_id),
        };
        *self.current.borrow_mut() = session.clone();
        info!("session opened for user {user_id} ({role})");
        session
    }

    pub fn clear_session(&self) {
        for key in [TOKEN_KEY, ROLE_KEY, USER_ID_KEY] {
            self.storage.remove(key);
        }
        *self.current.borrow_mut() = Session::default();
        info!("session cleared");
    }
}

impl<S: SessionStorage> TokenSource for SessionStore<S> {
    fn token(&self) -> Option<String> {
        self.current.borrow().token.clone()
    }
}

/// Reaction to a 401/403: drop the session and go to the login page, unless
/// the user is already there.
pub fn should_force_logout(status: u16, current_path: &str) -> bool {
    matches!(status, 401 | 403) && !current_path.contains("/login")
}

/// Body of the 401/403 listener: clears `store` when the failure calls for a
/// forced logout. Returns whether it did, so the caller knows to redirect.
pub fn handle_auth_lost<S: SessionStorage>(store: &SessionStore<S>, status: u16, current_path: &str) -> bool {
    if !should_force_logout(status, current_path) {
        return false;
    }
    warn!("HTTP {status} while on {current_path}: forcing logout");
    store.clear_session();
    true
}

/* ---------------- contexte injecté ----------------- */

#[derive(Clone)]
pub struct SessionContext {
    store: Rc<SessionStore<BrowserStorage>>,
    current: UseStateHandle<Session>,
    on_auth_lost: Callback<u16>,
}

impl PartialEq for SessionContext {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.store, &other.store) && *self.current == *other.current
    }
}

impl SessionContext {
    pub fn session(&self) -> &Session {
        &self.current
    }

    pub fn role(&self) -> Option<Role> {
        self.current.role
    }

    pub fn clear_session(&self) {
        self.store.clear_session();
        self.current.set(Session::default());
    }

    /// Opens the session from a login answer; on failure nothing changes and
    /// the message to show comes back.
    pub fn complete_login(&self, result: Result<LoginResponse, ApiError>) -> Result<(), String> {
        let session = complete_login(&self.store, result)?;
        self.current.set(session);
        Ok(())
    }

    /// Client bound to this session; the token is read when each request goes out.
    pub fn api(&self) -> Api {
        Api::new(
            ApiClient::new(API_BASE_URL),
            self.store.clone(),
            self.on_auth_lost.clone(),
        )
    }
}

#[hook]
pub fn use_session() -> SessionContext {
    use_context::<SessionContext>().expect("SessionProvider missing")
}

#[hook]
pub fn use_api() -> Api {
    use_session().api()
}

/* -------------- props du provider ----------------- */

#[derive(Properties, PartialEq)]
pub struct SessionProviderProps {
    #[prop_or_default]
    pub children: Children,
}

fn current_path() -> String {
    web_sys::window()
        .and_then(|w| w.location().pathname().ok())
        .unwrap_or_default()
}

/* -------------- provider global ------------------- */

/// Owns the session and the single listener that turns an authentication
/// failure into "clear session + redirect to /login". Must sit inside the router.
#[function_component(SessionProvider)]
pub fn session_provider(props: &SessionProviderProps) -> Html {
    let store = use_memo((), |_| SessionStore::load(BrowserStorage));
    let current = {
        let store = store.clone();
        use_state(move || store.session())
    };
    let navigator = use_navigator();

    let on_auth_lost = {
        let store = store.clone();
        let setter = current.setter();
        Callback::from(move |status: u16| {
            if !handle_auth_lost(&store, status, &current_path()) {
                return;
            }
            setter.set(Session::default());
            match &navigator {
                Some(nav) => nav.replace(&Route::Login),
                None => warn!("no router available, cannot redirect to /login"),
            }
        })
    };

    let context = SessionContext {
        store,
        current,
        on_auth_lost,
    };

    html! {
        <ContextProvider<SessionContext> {context}>
            { for props.children.iter() }
        </ContextProvider<SessionContext>>
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::collections::HashMap;

    use super::*;

    #[derive(Default, Clone)]
    pub(crate) struct MemoryStorage(Rc<RefCell<HashMap<String, String>>>);

    impl MemoryStorage {
        pub(crate) fn with(pairs: &[(&str, &str)]) -> Self {
            let storage = Self::default();
            for (k, v) in pairs {
                storage.write(k, v);
            }
            storage
        }

        pub(crate) fn get(&self, key: &str) -> Option<String> {
            self.0.borrow().get(key).cloned()
        }
    }

    impl SessionStorage for MemoryStorage {
        fn read(&self, key: &str) -> Option<String> {
            self.get(key)
        }

        fn write(&self, key: &str, value: &str) {
            self.0.borrow_mut().insert(key.to_string(), value.to_string());
        }

        fn remove(&self, key: &str) {
            self.0.borrow_mut().remove(key);
        }
    }

    #[test]
    fn empty_storage_means_no_session() {
        let store = SessionStore::load(MemoryStorage::default());
        assert_eq!(store.session(), Session::default());
        assert!(!store.session().is_authenticated());
    }

    #[test]
    fn restores_persisted_session_and_normalizes_role() {
        let storage = MemoryStorage::with(&[("token", "abc"), ("role", "admin"), ("userId", "7")]);
        let store = SessionStore::load(storage);
        assert_eq!(
            store.session(),
            Session {
                token: Some("abc".into()),
                role: Some(Role::Admin),
                user_id: Some(7),
            }
        );
    }

    #[test]
    fn set_session_writes_all_three_fields() {
        let storage = MemoryStorage::default();
        let store = SessionStore::load(storage.clone());
        store.set_session("jwt".into(), Role::User, 42);

        assert_eq!(storage.get("token").as_deref(), Some("jwt"));
        assert_eq!(storage.get("role").as_deref(), Some("USER"));
        assert_eq!(storage.get("userId").as_deref(), Some("42"));
        assert_eq!(store.token().as_deref(), Some("jwt"));
    }

    #[test]
    fn clear_session_removes_everything() {
        let storage = MemoryStorage::with(&[("token", "abc"), ("role", "USER"), ("userId", "1")]);
        let store = SessionStore::load(storage.clone());
        store.clear_session();

        assert!(storage.get("token").is_none());
        assert!(storage.get("role").is_none());
        assert!(storage.get("userId").is_none());
        assert_eq!(store.session(), Session::default());
        assert!(store.token().is_none());
    }

    #[test]
    fn reload_after_logout_is_anonymous() {
        let storage = MemoryStorage::default();
        let store = SessionStore::load(storage.clone());
        store.set_session("jwt".into(), Role::Admin, 3);
        store.clear_session();
        assert!(!SessionStore::load(storage).session().is_authenticated());
    }

    fn logged_in() -> (MemoryStorage, SessionStore<MemoryStorage>) {
        let storage = MemoryStorage::with(&[("token", "jwt"), ("role", "ADMIN"), ("userId", "5")]);
        let store = SessionStore::load(storage.clone());
        (storage, store)
    }

    #[test]
    fn auth_failure_off_login_clears_all_three_keys() {
        for status in [401, 403] {
            let (storage, store) = logged_in();
            assert!(handle_auth_lost(&store, status, "/inventory"));
            for key in ["token", "role", "userId"] {
                assert_eq!(storage.get(key), None, "{key} after {status}");
            }
            assert_eq!(store.session(), Session::default());
            assert!(store.token().is_none());
        }
    }

    #[test]
    fn auth_failure_on_login_keeps_the_session() {
        let (storage, store) = logged_in();
        assert!(!handle_auth_lost(&store, 401, "/login"));
        assert_eq!(storage.get("token").as_deref(), Some("jwt"));
        assert_eq!(storage.get("role").as_deref(), Some("ADMIN"));
        assert_eq!(storage.get("userId").as_deref(), Some("5"));
        assert!(store.session().is_authenticated());
    }

    #[test]
    fn other_failures_keep_the_session() {
        let (storage, store) = logged_in();
        assert!(!handle_auth_lost(&store, 500, "/inventory"));
        assert_eq!(storage.get("token").as_deref(), Some("jwt"));
    }

    #[test]
    fn forced_logout_only_on_auth_statuses_outside_login() {
        assert!(should_force_logout(401, "/inventory"));
        assert!(should_force_logout(403, "/boards"));
        assert!(!should_force_logout(401, "/login"));
        assert!(!should_force_logout(500, "/inventory"));
        assert!(!should_force_logout(404, "/inventory"));
    }
}
