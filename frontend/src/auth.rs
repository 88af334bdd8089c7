use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;
use yew_router::prelude::*;

use crate::guard::ReturnTo;
use crate::notice::use_notifier;
use crate::role::Role;
use crate::api::ApiError;
use crate::session::{use_session, Session, SessionStorage, SessionStore};
use crate::utils::{failure_text, input_value};
use crate::Route;

/* -------------------------------------------------------------------------- */
/*                     structures échangées avec l’API                         */
/* -------------------------------------------------------------------------- */

#[derive(Serialize)]
struct LoginBody {
    username: String,
    password: String,
}

#[derive(Serialize, Clone, Debug, Default, PartialEq)]
pub struct RegisterBody {
    pub username: String,
    pub password: String,
    pub matricule: String,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: Option<String>,
    pub role: Option<String>,
    pub user_id: Option<i64>,
}

#[derive(Debug, PartialEq, Eq)]
pub struct LoginGrant {
    pub token: String,
    pub role: Role,
    pub user_id: i64,
}

pub const INVALID_LOGIN_RESPONSE: &str = "Invalid response from server.";

impl TryFrom<LoginResponse> for LoginGrant {
    type Error = &'static str;

    fn try_from(resp: LoginResponse) -> Result<Self, Self::Error> {
        match (resp.token, resp.role, resp.user_id) {
            (Some(token), Some(role), Some(user_id)) if !token.is_empty() => {
                let role = role.parse().map_err(|_| INVALID_LOGIN_RESPONSE)?;
                Ok(LoginGrant { token, role, user_id })
            }
            _ => Err(INVALID_LOGIN_RESPONSE),
        }
    }
}

/// Stores the session when the login answer is complete; otherwise the store
/// is left as it was and the message to show is returned.
pub fn complete_login<S: SessionStorage>(
    store: &SessionStore<S>,
    result: Result<LoginResponse, ApiError>,
) -> Result<Session, String> {
    match result.map(LoginGrant::try_from) {
        Ok(Ok(grant)) => {
            info!("login ok, role {}", grant.role);
            Ok(store.set_session(grant.token, grant.role, grant.user_id))
        }
        Ok(Err(reason)) => Err(reason.to_string()),
        Err(e) => {
            warn!("login failed: {e}");
            Err(failure_text(&e, "Login failed"))
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegisterError {
    #[error("{0} is required")]
    Missing(&'static str),
}

impl RegisterBody {
    /// Trims every field; all three are mandatory.
    pub fn validated(&self) -> Result<RegisterBody, RegisterError> {
        let body = RegisterBody {
            username: self.username.trim().to_string(),
            password: self.password.clone(),
            matricule: self.matricule.trim().to_string(),
        };
        if body.username.is_empty() {
            return Err(RegisterError::Missing("Username"));
        }
        if body.password.trim().is_empty() {
            return Err(RegisterError::Missing("Password"));
        }
        if body.matricule.is_empty() {
            return Err(RegisterError::Missing("Matricule"));
        }
        Ok(body)
    }
}

/// `sub` claim of a JWT, read without checking the signature (display only).
pub fn username_from_token(token: &str) -> Option<String> {
    #[derive(Deserialize)]
    struct Claims {
        sub: Option<String>,
    }

    let payload = token.split('.').nth(1)?;
    let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')).ok()?;
    serde_json::from_slice::<Claims>(&bytes).ok()?.sub
}

/* -------------------------------------------------------------------------- */
/*                               composant login                               */
/* -------------------------------------------------------------------------- */

#[function_component(LoginForm)]
pub fn login_form() -> Html {
    let session = use_session();
    let navigator = use_navigator();
    let location = use_location();
    let username = use_state(String::new);
    let password = use_state(String::new);
    let message = use_state(String::new);
    let loading = use_state(|| false);

    let return_to = location
        .as_ref()
        .and_then(|l| l.state::<ReturnTo>())
        .map(|r| r.0.clone());

    let onsubmit = {
        let session = session.clone();
        let username = username.clone();
        let password = password.clone();
        let message = message.clone();
        let loading = loading.clone();

        Callback::from(move |ev: SubmitEvent| {
            ev.prevent_default();
            if username.trim().is_empty() || password.is_empty() {
                message.set("Username and password are required".into());
                return;
            }
            let body = LoginBody {
                username: username.trim().to_string(),
                password: (*password).clone(),
            };
            let session = session.clone();
            let message = message.clone();
            let loading = loading.clone();
            let navigator = navigator.clone();
            let return_to = return_to.clone();
            loading.set(true);

            spawn_local(async move {
                let result = session
                    .api()
                    .post::<_, LoginResponse>("/auth/login", &body)
                    .await;
                loading.set(false);
                match session.complete_login(result) {
                    Ok(()) => {
                        if let Some(nav) = navigator {
                            nav.push(&crate::guard::post_login_target(return_to.as_deref()));
                        }
                    }
                    Err(reason) => message.set(reason),
                }
            });
        })
    };

    html! {
        <div class="auth-container">
            <h2>{"Login"}</h2>
            <form {onsubmit}>
                <input type="text" placeholder="Username" value={(*username).clone()}
                       oninput={let s = username.clone(); move |e: InputEvent| s.set(input_value(&e))} />
                <input type="password" placeholder="Password" value={(*password).clone()}
                       oninput={let s = password.clone(); move |e: InputEvent| s.set(input_value(&e))} />
                <button type="submit" disabled={*loading}>
                    { if *loading { "Signing in…" } else { "Login" } }
                </button>
            </form>
            if !message.is_empty() {
                <p class="form-error">{ &*message }</p>
            }
            <p>{"Don't have an account? "}<Link<Route> to={Route::Register}>{"Register here"}</Link<Route>></p>
        </div>
    }
}

/* -------------------------------------------------------------------------- */
/*                             composant register                              */
/* -------------------------------------------------------------------------- */

#[function_component(RegisterForm)]
pub fn register_form() -> Html {
    let session = use_session();
    let notifier = use_notifier();
    let navigator = use_navigator();
    let form = use_state(RegisterBody::default);
    let message = use_state(String::new);
    let loading = use_state(|| false);

    let onsubmit = {
        let form = form.clone();
        let message = message.clone();
        let loading = loading.clone();

        Callback::from(move |ev: SubmitEvent| {
            ev.prevent_default();
            let body = match form.validated() {
                Ok(body) => body,
                Err(e) => {
                    message.set(e.to_string());
                    return;
                }
            };
            let api = session.api();
            let notifier = notifier.clone();
            let message = message.clone();
            let loading = loading.clone();
            let navigator = navigator.clone();
            loading.set(true);

            spawn_local(async move {
                let result = api.post_unit("/auth/register", &body).await;
                loading.set(false);
                match result {
                    Ok(()) => {
                        notifier.success("Registration successful");
                        if let Some(nav) = navigator {
                            nav.push(&Route::Login);
                        }
                    }
                    Err(e) => message.set(failure_text(&e, "Registration failed")),
                }
            });
        })
    };

    let field = |name: &'static str| {
        let form = form.clone();
        move |e: InputEvent| {
            let mut next = (*form).clone();
            let value = input_value(&e);
            match name {
                "username" => next.username = value,
                "password" => next.password = value,
                _ => next.matricule = value,
            }
            form.set(next);
        }
    };

    html! {
        <div class="auth-container">
            <h2>{"Register"}</h2>
            <form {onsubmit}>
                <input type="text" placeholder="Username" value={form.username.clone()} oninput={field("username")} />
                <input type="password" placeholder="Password" value={form.password.clone()} oninput={field("password")} />
                <input type="text" placeholder="Matricule (e.g. 90940)" value={form.matricule.clone()} oninput={field("matricule")} />
                <button type="submit" disabled={*loading}>{"Register"}</button>
            </form>
            if !message.is_empty() {
                <p class="form-error">{ &*message }</p>
            }
            <p>{"Already registered? "}<Link<Route> to={Route::Login}>{"Login"}</Link<Route>></p>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::tests::MemoryStorage;

    #[test]
    fn grant_requires_all_fields() {
        let ok = LoginResponse {
            token: Some("t".into()),
            role: Some("admin".into()),
            user_id: Some(5),
        };
        assert_eq!(
            LoginGrant::try_from(ok),
            Ok(LoginGrant {
                token: "t".into(),
                role: Role::Admin,
                user_id: 5
            })
        );

        let no_id = LoginResponse {
            token: Some("t".into()),
            role: Some("USER".into()),
            user_id: None,
        };
        assert_eq!(LoginGrant::try_from(no_id), Err(INVALID_LOGIN_RESPONSE));

        let bad_role = LoginResponse {
            token: Some("t".into()),
            role: Some("guest".into()),
            user_id: Some(1),
        };
        assert_eq!(LoginGrant::try_from(bad_role), Err(INVALID_LOGIN_RESPONSE));
    }

    fn signed_in_store() -> (MemoryStorage, SessionStore<MemoryStorage>) {
        let storage = MemoryStorage::with(&[("token", "old"), ("role", "USER"), ("userId", "2")]);
        let store = SessionStore::load(storage.clone());
        (storage, store)
    }

    fn assert_untouched(storage: &MemoryStorage, store: &SessionStore<MemoryStorage>) {
        assert_eq!(storage.get("token").as_deref(), Some("old"));
        assert_eq!(storage.get("role").as_deref(), Some("USER"));
        assert_eq!(storage.get("userId").as_deref(), Some("2"));
        assert_eq!(store.session().user_id, Some(2));
    }

    #[test]
    fn rejected_login_leaves_the_session_alone() {
        let (storage, store) = signed_in_store();
        let denied = Err(ApiError::Unauthorized { status: 401, message: Some("Bad credentials".into()) });
        assert_eq!(complete_login(&store, denied), Err("Bad credentials".to_string()));
        assert_untouched(&storage, &store);

        let offline = Err(ApiError::Network("offline".into()));
        assert_eq!(complete_login(&store, offline), Err("Login failed".to_string()));
        assert_untouched(&storage, &store);
    }

    #[test]
    fn incomplete_login_answer_leaves_the_session_alone() {
        let (storage, store) = signed_in_store();
        let partial = LoginResponse { token: Some("new".into()), role: None, user_id: Some(9) };
        assert_eq!(complete_login(&store, Ok(partial)), Err(INVALID_LOGIN_RESPONSE.to_string()));
        assert_untouched(&storage, &store);
    }

    #[test]
    fn accepted_login_stores_upper_cased_role() {
        let (storage, store) = signed_in_store();
        let answer = LoginResponse { token: Some("new".into()), role: Some("admin".into()), user_id: Some(9) };
        let session = complete_login(&store, Ok(answer)).unwrap();
        assert_eq!(session.role, Some(Role::Admin));
        assert_eq!(storage.get("token").as_deref(), Some("new"));
        assert_eq!(storage.get("role").as_deref(), Some("ADMIN"));
        assert_eq!(storage.get("userId").as_deref(), Some("9"));
    }

    #[test]
    fn login_response_is_camel_case() {
        let resp: LoginResponse =
            serde_json::from_str(r#"{"token":"x","role":"user","userId":9}"#).unwrap();
        assert_eq!(resp.user_id, Some(9));
    }

    #[test]
    fn register_fields_are_mandatory() {
        let mut body = RegisterBody {
            username: "  alice ".into(),
            password: "pw".into(),
            matricule: " 90940".into(),
        };
        let ok = body.validated().unwrap();
        assert_eq!(ok.username, "alice");
        assert_eq!(ok.matricule, "90940");

        body.matricule = "   ".into();
        assert_eq!(body.validated(), Err(RegisterError::Missing("Matricule")));
        assert_eq!(
            RegisterError::Missing("Matricule").to_string(),
            "Matricule is required"
        );
    }

    #[test]
    fn decodes_subject_from_jwt() {
        // {"sub":"jdoe","role":"ADMIN"}
        let payload = URL_SAFE_NO_PAD.encode(r#"{"sub":"jdoe","role":"ADMIN"}"#);
        let token = format!("eyJhbGciOiJIUzI1NiJ9.{payload}.sig");
        assert_eq!(username_from_token(&token).as_deref(), Some("jdoe"));
        assert_eq!(username_from_token("not-a-jwt"), None);
        assert_eq!(username_from_token("a.!!!.c"), None);
    }
}
