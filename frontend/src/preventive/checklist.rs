//! Board checklists: validation and the per-board panel.

use log::{error, info};
use thiserror::Error;
use yew::platform::spawn_local;
use yew::prelude::*;

use crate::api::Api;
use crate::models::{Board, Checklist, WORK_STATUSES};
use crate::notice::use_notifier;
use crate::session::use_api;
use crate::utils::{confirm, failure_text, input_checked, input_value, non_empty, text_or_dash};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChecklistError {
    #[error("Technician name is required.")]
    MissingTechnician,
    #[error("Quality agent name is required when validated.")]
    MissingQualityAgent,
    #[error("Completion must be a whole number between 0 and 100.")]
    Completion,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ChecklistDraft {
    pub id: Option<i64>,
    pub board_id: i64,
    pub technician_name: String,
    pub quality_agent_name: String,
    pub completion: String,
    pub comments: String,
    pub quality_validated: bool,
    pub validation_date: String,
    pub expiry_date: String,
    pub work_status: String,
}

impl ChecklistDraft {
    pub fn from_checklist(c: &Checklist) -> Self {
        Self {
            id: c.id,
            board_id: c.board_id,
            technician_name: c.technician_name.clone(),
            quality_agent_name: c.quality_agent_name.clone(),
            completion: c.completion_percentage.to_string(),
            comments: c.comments.clone(),
            quality_validated: c.quality_validated,
            validation_date: c.validation_date.clone().unwrap_or_default(),
            expiry_date: c.expiry_date.clone().unwrap_or_default(),
            work_status: c.work_status.clone(),
        }
    }

    pub fn validate(&self) -> Result<Checklist, ChecklistError> {
        if self.technician_name.trim().is_empty() {
            return Err(ChecklistError::MissingTechnician);
        }
        if self.quality_validated && self.quality_agent_name.trim().is_empty() {
            return Err(ChecklistError::MissingQualityAgent);
        }
        let completion: u8 = self.completion.trim().parse().map_err(|_| ChecklistError::Completion)?;
        if completion > 100 {
            return Err(ChecklistError::Completion);
        }
        Ok(Checklist {
            id: self.id,
            board_id: self.board_id,
            technician_name: self.technician_name.trim().to_string(),
            quality_agent_name: self.quality_agent_name.trim().to_string(),
            completion_percentage: completion,
            comments: self.comments.clone(),
            quality_validated: self.quality_validated,
            validation_date: non_empty(self.validation_date.clone()),
            expiry_date: non_empty(self.expiry_date.clone()),
            work_status: self.work_status.clone(),
        })
    }
}

/// Checklists of one board; the backend only lists them all.
pub fn for_board(all: Vec<Checklist>, board_id: i64) -> Vec<Checklist> {
    all.into_iter().filter(|c| c.board_id == board_id).collect()
}

async fn load(api: &Api, board_id: i64) -> Result<Vec<Checklist>, crate::api::ApiError> {
    Ok(for_board(api.get::<Vec<Checklist>>("/checklists").await?, board_id))
}

/* -------------------------------------------------------------------------- */
/*                                   panneau                                  */
/* -------------------------------------------------------------------------- */

#[derive(Properties, PartialEq)]
pub struct ChecklistPanelProps {
    pub board: Board,
    pub on_close: Callback<()>,
}

#[function_component(ChecklistPanel)]
pub fn checklist_panel(props: &ChecklistPanelProps) -> Html {
    let api = use_api();
    let notifier = use_notifier();
    let board_id = props.board.id.unwrap_or_default();

    let items = use_state(Vec::<Checklist>::new);
    let loading = use_state(|| true);
    let draft = use_state(|| None::<ChecklistDraft>);
    let message = use_state(String::new);
    let reload = use_state(|| 0_u32);

    {
        let (api, notifier, items, loading) = (api.clone(), notifier.clone(), items.clone(), loading.clone());
        use_effect_with((board_id, *reload), move |(board_id, _)| {
            let board_id = *board_id;
            spawn_local(async move {
                match load(&api, board_id).await {
                    Ok(list) => items.set(list),
                    Err(e) => {
                        error!("checklists of board {board_id}: {e}");
                        notifier.error(failure_text(&e, "Failed to fetch checklists."));
                    }
                }
                loading.set(false);
            });
            || ()
        });
    }

    let open = {
        let (draft, message) = (draft.clone(), message.clone());
        Callback::from(move |c: Checklist| {
            message.set(String::new());
            draft.set(Some(ChecklistDraft::from_checklist(&c)));
        })
    };

    let edit = |apply: fn(&mut ChecklistDraft, String)| {
        let draft = draft.clone();
        Callback::from(move |e: Event| {
            if let Some(mut next) = (*draft).clone() {
                apply(&mut next, input_value(&e));
                draft.set(Some(next));
            }
        })
    };

    let on_validated = {
        let draft = draft.clone();
        Callback::from(move |e: Event| {
            if let Some(mut next) = (*draft).clone() {
                next.quality_validated = input_checked(&e);
                draft.set(Some(next));
            }
        })
    };

    let on_submit = {
        let (api, notifier) = (api.clone(), notifier.clone());
        let (draft, message, reload) = (draft.clone(), message.clone(), reload.clone());
        Callback::from(move |_: MouseEvent| {
            let Some(current) = (*draft).clone() else { return };
            let checklist = match current.validate() {
                Ok(c) => c,
                Err(e) => {
                    message.set(e.to_string());
                    return;
                }
            };
            let (api, notifier, draft, reload) = (api.clone(), notifier.clone(), draft.clone(), reload.clone());
            spawn_local(async move {
                let result = match checklist.id {
                    Some(id) => api.put_unit(&format!("/checklists/{id}"), &checklist).await,
                    None => api.post_unit("/checklists", &checklist).await,
                };
                match result {
                    Ok(()) => {
                        notifier.success(if checklist.id.is_some() {
                            "Checklist updated successfully!"
                        } else {
                            "Checklist created successfully!"
                        });
                        draft.set(None);
                        reload.set(*reload + 1);
                    }
                    Err(e) => notifier.error(failure_text(&e, "Failed to submit checklist.")),
                }
            });
        })
    };

    let on_delete = {
        let reload = reload.clone();
        Callback::from(move |id: i64| {
            if !confirm("Are you sure you want to delete this checklist?") {
                return;
            }
            let (api, notifier, reload) = (api.clone(), notifier.clone(), reload.clone());
            spawn_local(async move {
                match api.delete(&format!("/checklists/{id}")).await {
                    Ok(()) => {
                        info!("checklist {id} deleted");
                        notifier.success("Checklist deleted successfully!");
                        reload.set(*reload + 1);
                    }
                    Err(e) => notifier.error(failure_text(&e, "Failed to delete checklist.")),
                }
            });
        })
    };

    let on_close = {
        let on_close = props.on_close.clone();
        Callback::from(move |_: MouseEvent| on_close.emit(()))
    };

    html! {
        <div class="modal-backdrop">
            <div class="modal wide">
                <h2>{ format!("Checklists - {}", props.board.label()) }</h2>
                <button class="primary" onclick={let open = open.clone(); move |_| open.emit(Checklist::blank(board_id))}>
                    {"New checklist"}
                </button>

                if *loading {
                    <p class="loading">{"Loading…"}</p>
                } else if items.is_empty() {
                    <p class="empty">{"No checklists for this board."}</p>
                } else {
                    <table class="data-table">
                        <thead>
                            <tr>
                                <th>{"Technician"}</th><th>{"Quality agent"}</th><th>{"Completion"}</th>
                                <th>{"Validated"}</th><th>{"Status"}</th><th>{"Expiry"}</th><th>{"Actions"}</th>
                            </tr>
                        </thead>
                        <tbody>
                            { for items.iter().map(|c| {
                                let (open, on_delete, checklist) = (open.clone(), on_delete.clone(), c.clone());
                                let id = c.id.unwrap_or_default();
                                html! {
                                    <tr key={id}>
                                        <td>{ &c.technician_name }</td>
                                        <td>{ text_or_dash(Some(c.quality_agent_name.as_str())) }</td>
                                        <td>
                                            <progress max="100" value={c.completion_percentage.to_string()} />
                                            { format!(" {}%", c.completion_percentage) }
                                        </td>
                                        <td>{ if c.quality_validated { "Yes" } else { "No" } }</td>
                                        <td><span class={classes!("status", c.work_status.to_lowercase())}>{ &c.work_status }</span></td>
                                        <td>{ text_or_dash(c.expiry_date.as_deref()) }</td>
                                        <td class="actions">
                                            <button onclick={move |_| open.emit(checklist.clone())}>{"Edit"}</button>
                                            <button class="danger" onclick={move |_| on_delete.emit(id)}>{"Delete"}</button>
                                        </td>
                                    </tr>
                                }
                            }) }
                        </tbody>
                    </table>
                }

                if let Some(d) = (*draft).clone() {
                    <div class="form-grid checklist-form">
                        <h3>{ if d.id.is_some() { "Edit checklist" } else { "New checklist" } }</h3>
                        <label>{"Technician"}
                            <input value={d.technician_name.clone()} onchange={edit(|d, v| d.technician_name = v)} />
                        </label>
                        <label>{"Quality agent"}
                            <input value={d.quality_agent_name.clone()} onchange={edit(|d, v| d.quality_agent_name = v)} />
                        </label>
                        <label>{"Completion (%)"}
                            <input type="number" min="0" max="100" value={d.completion.clone()} onchange={edit(|d, v| d.completion = v)} />
                        </label>
                        <label>{"Work status"}
                            <select onchange={edit(|d, v| d.work_status = v)}>
                                { for WORK_STATUSES.iter().map(|s| html! {
                                    <option value={*s} selected={d.work_status == *s}>{ *s }</option>
                                }) }
                            </select>
                        </label>
                        <label class="checkbox">
                            <input type="checkbox" checked={d.quality_validated} onchange={on_validated} />
                            {"Quality validated"}
                        </label>
                        <label>{"Validation date"}
                            <input type="date" value={d.validation_date.clone()} onchange={edit(|d, v| d.validation_date = v)} />
                        </label>
                        <label>{"Expiry date"}
                            <input type="date" value={d.expiry_date.clone()} onchange={edit(|d, v| d.expiry_date = v)} />
                        </label>
                        <label class="wide">{"Comments"}
                            <textarea value={d.comments.clone()} onchange={edit(|d, v| d.comments = v)} />
                        </label>
                        if !message.is_empty() {
                            <p class="form-error">{ &*message }</p>
                        }
                        <div class="form-actions">
                            <button class="primary" onclick={on_submit}>{"Submit"}</button>
                            <button onclick={let draft = draft.clone(); move |_| draft.set(None)}>{"Cancel"}</button>
                        </div>
                    </div>
                }

                <div class="form-actions">
                    <button onclick={on_close}>{"Close"}</button>
                </div>
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> ChecklistDraft {
        ChecklistDraft::from_checklist(&Checklist::blank(3))
    }

    #[test]
    fn technician_is_required() {
        assert_eq!(draft().validate(), Err(ChecklistError::MissingTechnician));
    }

    #[test]
    fn validated_needs_a_quality_agent() {
        let d = ChecklistDraft {
            technician_name: "Ali".into(),
            quality_validated: true,
            ..draft()
        };
        assert_eq!(d.validate(), Err(ChecklistError::MissingQualityAgent));

        let ok = ChecklistDraft { quality_agent_name: "Sara".into(), ..d }.validate().unwrap();
        assert!(ok.quality_validated);
        assert_eq!(ok.board_id, 3);
    }

    #[test]
    fn completion_bounds() {
        let base = ChecklistDraft { technician_name: "Ali".into(), ..draft() };
        for bad in ["101", "-1", "abc", "50.5"] {
            let d = ChecklistDraft { completion: bad.into(), ..base.clone() };
            assert_eq!(d.validate(), Err(ChecklistError::Completion), "{bad}");
        }
        let d = ChecklistDraft { completion: "100".into(), ..base };
        assert_eq!(d.validate().unwrap().completion_percentage, 100);
    }

    #[test]
    fn keeps_only_the_boards_checklists() {
        let all = vec![Checklist::blank(1), Checklist::blank(2), Checklist::blank(1)];
        assert_eq!(for_board(all, 1).len(), 2);
    }

    #[test]
    fn blank_dates_are_sent_as_null() {
        let d = ChecklistDraft { technician_name: "Ali".into(), ..draft() };
        let c = d.validate().unwrap();
        assert_eq!(c.validation_date, None);
        assert_eq!(c.work_status, "NOT_STARTED");
    }
}
