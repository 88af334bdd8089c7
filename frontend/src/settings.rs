//! Account settings: password change.

use log::{info, warn};
use serde::Serialize;
use thiserror::Error;
use yew::platform::spawn_local;
use yew::prelude::*;

use crate::notice::use_notifier;
use crate::session::use_api;
use crate::utils::{failure_text, input_value};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PasswordError {
    #[error("All fields are required")]
    Missing,
    #[error("New passwords do not match")]
    Mismatch,
    #[error("Password must be at least 8 characters long and include both letters and numbers.")]
    TooWeak,
}

#[derive(Serialize, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ChangePassword {
    pub current_password: String,
    pub new_password: String,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct PasswordForm {
    pub current: String,
    pub new: String,
    pub confirm: String,
}

/// ASCII letters and digits only, eight or more, with at least one of each.
pub fn is_strong(password: &str) -> bool {
    password.len() >= 8
        && password.chars().all(|c| c.is_ascii_alphanumeric())
        && password.chars().any(|c| c.is_ascii_alphabetic())
        && password.chars().any(|c| c.is_ascii_digit())
}

impl PasswordForm {
    pub fn validated(&self) -> Result<ChangePassword, PasswordError> {
        if self.current.is_empty() || self.new.is_empty() || self.confirm.is_empty() {
            return Err(PasswordError::Missing);
        }
        if self.new != self.confirm {
            return Err(PasswordError::Mismatch);
        }
        if !is_strong(&self.new) {
            return Err(PasswordError::TooWeak);
        }
        Ok(ChangePassword {
            current_password: self.current.clone(),
            new_password: self.new.clone(),
        })
    }
}

#[function_component(Settings)]
pub fn settings() -> Html {
    let api = use_api();
    let notifier = use_notifier();
    let form = use_state(PasswordForm::default);
    let message = use_state(String::new);
    let saving = use_state(|| false);

    let edit = |apply: fn(&mut PasswordForm, String)| {
        let form = form.clone();
        Callback::from(move |e: InputEvent| {
            let mut next = (*form).clone();
            apply(&mut next, input_value(&e));
            form.set(next);
        })
    };

    let onsubmit = {
        let (form, message, saving) = (form.clone(), message.clone(), saving.clone());
        Callback::from(move |ev: SubmitEvent| {
            ev.prevent_default();
            let body = match form.validated() {
                Ok(b) => b,
                Err(e) => {
                    message.set(e.to_string());
                    return;
                }
            };
            message.set(String::new());
            saving.set(true);
            let (api, notifier, form, message, saving) =
                (api.clone(), notifier.clone(), form.clone(), message.clone(), saving.clone());
            spawn_local(async move {
                let result = api.post_unit("/users/change-password", &body).await;
                saving.set(false);
                match result {
                    Ok(()) => {
                        info!("password changed");
                        notifier.success("Password updated successfully");
                        form.set(PasswordForm::default());
                    }
                    Err(e) => {
                        warn!("password change failed: {e}");
                        message.set(failure_text(&e, "Failed to update password"));
                    }
                }
            });
        })
    };

    html! {
        <div class="page">
            <h1>{"Settings"}</h1>
            <form class="form-grid narrow" {onsubmit}>
                <h3>{"Change password"}</h3>
                <label>{"Current password"}
                    <input type="password" value={form.current.clone()} oninput={edit(|f, v| f.current = v)} />
                </label>
                <label>{"New password"}
                    <input type="password" value={form.new.clone()} oninput={edit(|f, v| f.new = v)} />
                </label>
                <label>{"Confirm new password"}
                    <input type="password" value={form.confirm.clone()} oninput={edit(|f, v| f.confirm = v)} />
                </label>
                if !message.is_empty() {
                    <p class="form-error">{ &*message }</p>
                }
                <div class="form-actions">
                    <button type="submit" class="primary" disabled={*saving}>
                        { if *saving { "Saving…" } else { "Update password" } }
                    </button>
                </div>
            </form>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(current: &str, new: &str, confirm: &str) -> PasswordForm {
        PasswordForm { current: current.into(), new: new.into(), confirm: confirm.into() }
    }

    #[test]
    fn strength_rules() {
        assert!(is_strong("abcd1234"));
        assert!(!is_strong("abc1234"));
        assert!(!is_strong("abcdefgh"));
        assert!(!is_strong("12345678"));
        assert!(!is_strong("abcd 1234"));
        assert!(!is_strong("abcd123!"));
        assert!(!is_strong("àbcd1234"));
    }

    #[test]
    fn mismatch_is_reported_before_strength() {
        assert_eq!(form("old", "short", "other").validated(), Err(PasswordError::Mismatch));
        assert_eq!(form("old", "short", "short").validated(), Err(PasswordError::TooWeak));
        assert_eq!(form("", "abcd1234", "abcd1234").validated(), Err(PasswordError::Missing));
    }

    #[test]
    fn body_uses_backend_names() {
        let body = form("old", "abcd1234", "abcd1234").validated().unwrap();
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({"currentPassword": "old", "newPassword": "abcd1234"})
        );
    }
}
