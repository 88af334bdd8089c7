//! Preventive maintenance administration: reference data, board assignment
//! and the weekly schedule.

use log::{error, info, warn};
use thiserror::Error;
use yew::platform::spawn_local;
use yew::prelude::*;

use super::grid::{Cell, ScheduleGrid, ScheduleTable, Unassign};
use crate::models::{Board, NamedRecord, Pack, ScheduleEntry, Site, UserSummary};
use crate::notice::use_notifier;
use crate::session::use_api;
use crate::utils::{confirm, current_year, failure_text, input_value, text_or_dash};

/* -------------------------------------------------------------------------- */
/*                          sites / packs / projets                           */
/* -------------------------------------------------------------------------- */

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecordKind {
    Site,
    Pack,
    Project,
}

impl RecordKind {
    pub fn endpoint(self) -> &'static str {
        match self {
            RecordKind::Site => "/sites",
            RecordKind::Pack => "/packs",
            RecordKind::Project => "/projects",
        }
    }

    pub fn noun(self) -> &'static str {
        match self {
            RecordKind::Site => "Site",
            RecordKind::Pack => "Pack",
            RecordKind::Project => "Project",
        }
    }

    fn has_location(self) -> bool {
        self == RecordKind::Site
    }

    fn has_site(self) -> bool {
        self != RecordKind::Site
    }

    fn has_year(self) -> bool {
        self == RecordKind::Project
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecordError {
    #[error("Name is required.")]
    MissingName,
    #[error("Please select a site.")]
    MissingSite,
    #[error("Year must be a number.")]
    BadYear,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct RecordDraft {
    pub name: String,
    pub location: String,
    pub site_id: String,
    pub year: String,
}

impl RecordDraft {
    pub fn from_record(r: &NamedRecord) -> Self {
        Self {
            name: r.name.clone().unwrap_or_default(),
            location: r.location.clone().unwrap_or_default(),
            site_id: r.site_id.map(|id| id.to_string()).unwrap_or_default(),
            year: r.year.map(|y| y.to_string()).unwrap_or_default(),
        }
    }

    /// Fields the kind does not carry are left as they were on `base`.
    pub fn apply(&self, kind: RecordKind, base: NamedRecord) -> Result<NamedRecord, RecordError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(RecordError::MissingName);
        }
        let mut record = NamedRecord { name: Some(name.to_string()), ..base };
        if kind.has_location() {
            let location = self.location.trim();
            record.location = (!location.is_empty()).then(|| location.to_string());
        }
        if kind.has_site() {
            record.site_id = Some(self.site_id.trim().parse().map_err(|_| RecordError::MissingSite)?);
        }
        if kind.has_year() {
            record.year = Some(self.year.trim().parse().map_err(|_| RecordError::BadYear)?);
        }
        Ok(record)
    }
}

pub fn site_name(sites: &[Site], id: Option<i64>) -> String {
    id.and_then(|id| sites.iter().find(|s| s.id == Some(id)))
        .map(|s| s.label().to_string())
        .unwrap_or_else(|| "N/A".into())
}

#[derive(Clone, PartialEq)]
struct RecordEditing {
    base: NamedRecord,
    draft: RecordDraft,
    error: Option<String>,
}

#[derive(Properties, PartialEq)]
struct RecordTabProps {
    kind: RecordKind,
}

#[function_component(RecordTab)]
fn record_tab(props: &RecordTabProps) -> Html {
    let kind = props.kind;
    let api = use_api();
    let notifier = use_notifier();

    let records = use_state(Vec::<NamedRecord>::new);
    let sites = use_state(Vec::<Site>::new);
    let loading = use_state(|| true);
    let editing = use_state(|| None::<RecordEditing>);
    let reload = use_state(|| 0_u32);

    {
        let (api, notifier) = (api.clone(), notifier.clone());
        let (records, sites, loading) = (records.clone(), sites.clone(), loading.clone());
        use_effect_with((kind, *reload), move |(kind, _)| {
            let kind = *kind;
            loading.set(true);
            spawn_local(async move {
                let (list, site_list) = futures::join!(
                    api.get::<Vec<NamedRecord>>(kind.endpoint()),
                    api.get::<Vec<Site>>("/sites"),
                );
                match list {
                    Ok(list) => records.set(list),
                    Err(e) => {
                        error!("{}: {e}", kind.endpoint());
                        notifier.error(failure_text(&e, &format!("Failed to fetch {}s.", kind.noun().to_lowercase())));
                    }
                }
                match site_list {
                    Ok(s) => sites.set(s),
                    Err(e) => warn!("sites: {e}"),
                }
                loading.set(false);
            });
            || ()
        });
    }

    let open = {
        let editing = editing.clone();
        Callback::from(move |record: NamedRecord| {
            let mut draft = RecordDraft::from_record(&record);
            if kind.has_year() && draft.year.is_empty() {
                draft.year = current_year().to_string();
            }
            editing.set(Some(RecordEditing { base: record, draft, error: None }))
        })
    };

    let edit = |apply: fn(&mut RecordDraft, String)| {
        let editing = editing.clone();
        Callback::from(move |e: Event| {
            if let Some(mut next) = (*editing).clone() {
                apply(&mut next.draft, input_value(&e));
                editing.set(Some(next));
            }
        })
    };

    let on_save = {
        let (api, notifier, editing, reload) = (api.clone(), notifier.clone(), editing.clone(), reload.clone());
        Callback::from(move |_: MouseEvent| {
            let Some(current) = (*editing).clone() else { return };
            let record = match current.draft.apply(kind, current.base.clone()) {
                Ok(r) => r,
                Err(e) => {
                    editing.set(Some(RecordEditing { error: Some(e.to_string()), ..current }));
                    return;
                }
            };
            let (api, notifier, editing, reload) = (api.clone(), notifier.clone(), editing.clone(), reload.clone());
            spawn_local(async move {
                let result = match record.id {
                    Some(id) => api.put_unit(&format!("{}/{id}", kind.endpoint()), &record).await,
                    None => api.post_unit(kind.endpoint(), &record).await,
                };
                match result {
                    Ok(()) => {
                        let verb = if record.id.is_some() { "updated" } else { "created" };
                        notifier.success(format!("{} {verb} successfully!", kind.noun()));
                        editing.set(None);
                        reload.set(*reload + 1);
                    }
                    Err(e) => notifier.error(failure_text(&e, &format!("Failed to submit {}.", kind.noun().to_lowercase()))),
                }
            });
        })
    };

    let on_delete = {
        let reload = reload.clone();
        Callback::from(move |id: i64| {
            if !confirm(&format!("Are you sure you want to delete this {}?", kind.noun().to_lowercase())) {
                return;
            }
            let (api, notifier, reload) = (api.clone(), notifier.clone(), reload.clone());
            spawn_local(async move {
                match api.delete(&format!("{}/{id}", kind.endpoint())).await {
                    Ok(()) => {
                        info!("{} {id} deleted", kind.noun());
                        notifier.success(format!("{} deleted successfully!", kind.noun()));
                        reload.set(*reload + 1);
                    }
                    Err(e) => notifier.error(failure_text(&e, &format!("Failed to delete {}.", kind.noun().to_lowercase()))),
                }
            });
        })
    };

    html! {
        <section>
            <div class="toolbar">
                <button class="primary" onclick={let open = open.clone(); move |_| open.emit(NamedRecord::default())}>
                    { format!("Add {}", kind.noun()) }
                </button>
            </div>

            if *loading {
                <p class="loading">{"Loading…"}</p>
            } else if records.is_empty() {
                <p class="empty">{ format!("No {}s yet.", kind.noun().to_lowercase()) }</p>
            } else {
                <table class="data-table">
                    <thead>
                        <tr>
                            <th>{"Name"}</th>
                            if kind.has_location() { <th>{"Location"}</th> }
                            if kind.has_year() { <th>{"Year"}</th> }
                            if kind.has_site() { <th>{"Site"}</th> }
                            <th>{"Actions"}</th>
                        </tr>
                    </thead>
                    <tbody>
                        { for records.iter().map(|r| {
                            let id = r.id.unwrap_or_default();
                            let (open, on_delete, record) = (open.clone(), on_delete.clone(), r.clone());
                            html! {
                                <tr key={id}>
                                    <td>{ r.label() }</td>
                                    if kind.has_location() { <td>{ text_or_dash(r.location.as_deref()) }</td> }
                                    if kind.has_year() { <td>{ r.year.map(|y| y.to_string()).unwrap_or_else(|| "-".into()) }</td> }
                                    if kind.has_site() { <td>{ site_name(&sites, r.site_id) }</td> }
                                    <td class="actions">
                                        <button onclick={move |_| open.emit(record.clone())}>{"Edit"}</button>
                                        <button class="danger" onclick={move |_| on_delete.emit(id)}>{"Delete"}</button>
                                    </td>
                                </tr>
                            }
                        }) }
                    </tbody>
                </table>
            }

            if let Some(current) = (*editing).clone() {
                <div class="modal-backdrop">
                    <div class="modal">
                        <h2>{ format!("{} {}", if current.base.id.is_some() { "Edit" } else { "Add" }, kind.noun()) }</h2>
                        <div class="form-grid">
                            <label>{"Name"}
                                <input value={current.draft.name.clone()} onchange={edit(|d, v| d.name = v)} required={true} />
                            </label>
                            if kind.has_location() {
                                <label>{"Location"}
                                    <input value={current.draft.location.clone()} onchange={edit(|d, v| d.location = v)} />
                                </label>
                            }
                            if kind.has_year() {
                                <label>{"Year"}
                                    <input type="number" value={current.draft.year.clone()} onchange={edit(|d, v| d.year = v)} />
                                </label>
                            }
                            if kind.has_site() {
                                <label>{"Site"}
                                    <select onchange={edit(|d, v| d.site_id = v)}>
                                        <option value="" selected={current.draft.site_id.is_empty()}>{"Select a site"}</option>
                                        { for sites.iter().filter_map(|s| s.id.map(|id| (id, s))).map(|(id, s)| html! {
                                            <option value={id.to_string()} selected={current.draft.site_id == id.to_string()}>{ s.label() }</option>
                                        }) }
                                    </select>
                                </label>
                            }
                        </div>
                        if let Some(msg) = &current.error {
                            <p class="form-error">{ msg }</p>
                        }
                        <div class="form-actions">
                            <button class="primary" onclick={on_save}>{"Save"}</button>
                            <button onclick={let editing = editing.clone(); move |_| editing.set(None)}>{"Cancel"}</button>
                        </div>
                    </div>
                </div>
            }
        </section>
    }
}

/* -------------------------------------------------------------------------- */
/*                            affectation des cartes                          */
/* -------------------------------------------------------------------------- */

/// Board with its pack and technician replaced; an empty choice clears the link.
pub fn with_assignment(board: Board, pack: &str, user: &str) -> Board {
    Board {
        pack_id: pack.trim().parse().ok(),
        assigned_user_id: user.trim().parse().ok(),
        ..board
    }
}

pub fn user_name(users: &[UserSummary], id: Option<i64>) -> String {
    id.and_then(|id| users.iter().find(|u| u.id == id))
        .and_then(|u| u.username.clone())
        .unwrap_or_else(|| "Unassigned".into())
}

#[derive(Clone, PartialEq)]
struct Assigning {
    board: Board,
    pack: String,
    user: String,
}

#[function_component(AssignmentTab)]
fn assignment_tab() -> Html {
    let api = use_api();
    let notifier = use_notifier();

    let boards = use_state(Vec::<Board>::new);
    let packs = use_state(Vec::<Pack>::new);
    let users = use_state(Vec::<UserSummary>::new);
    let loading = use_state(|| true);
    let assigning = use_state(|| None::<Assigning>);
    let reload = use_state(|| 0_u32);

    {
        let (api, notifier) = (api.clone(), notifier.clone());
        let (boards, packs, users, loading) = (boards.clone(), packs.clone(), users.clone(), loading.clone());
        use_effect_with(*reload, move |_| {
            spawn_local(async move {
                let (b, p, u) = futures::join!(
                    api.get::<Vec<Board>>("/boards"),
                    api.get::<Vec<Pack>>("/packs"),
                    api.get::<Vec<UserSummary>>("/users"),
                );
                match (b, p, u) {
                    (Ok(b), Ok(p), Ok(u)) => {
                        boards.set(b);
                        packs.set(p);
                        users.set(u);
                    }
                    (Err(e), _, _) | (_, Err(e), _) | (_, _, Err(e)) => {
                        error!("assignment data: {e}");
                        notifier.error(failure_text(&e, "Failed to fetch data"));
                    }
                }
                loading.set(false);
            });
            || ()
        });
    }

    let open = {
        let assigning = assigning.clone();
        Callback::from(move |board: Board| {
            assigning.set(Some(Assigning {
                pack: board.pack_id.map(|id| id.to_string()).unwrap_or_default(),
                user: board.assigned_user_id.map(|id| id.to_string()).unwrap_or_default(),
                board,
            }))
        })
    };

    let edit = |apply: fn(&mut Assigning, String)| {
        let assigning = assigning.clone();
        Callback::from(move |e: Event| {
            if let Some(mut next) = (*assigning).clone() {
                apply(&mut next, input_value(&e));
                assigning.set(Some(next));
            }
        })
    };

    let on_save = {
        let (assigning, reload) = (assigning.clone(), reload.clone());
        Callback::from(move |_: MouseEvent| {
            let Some(current) = (*assigning).clone() else { return };
            let Some(id) = current.board.id else { return };
            let board = with_assignment(current.board, &current.pack, &current.user);
            let (api, notifier, assigning, reload) = (api.clone(), notifier.clone(), assigning.clone(), reload.clone());
            spawn_local(async move {
                match api.put_unit(&format!("/boards/{id}"), &board).await {
                    Ok(()) => {
                        notifier.success("Board assignments updated successfully!");
                        assigning.set(None);
                        reload.set(*reload + 1);
                    }
                    Err(e) => notifier.error(failure_text(&e, "Failed to update board assignments")),
                }
            });
        })
    };

    let pack_name = |id: Option<i64>| {
        id.and_then(|id| packs.iter().find(|p| p.id == Some(id)))
            .map(|p| p.label().to_string())
            .unwrap_or_else(|| "N/A".into())
    };

    html! {
        <section>
            if *loading {
                <p class="loading">{"Loading…"}</p>
            } else if boards.is_empty() {
                <p class="empty">{"No boards found."}</p>
            } else {
                <table class="data-table">
                    <thead>
                        <tr><th>{"FB Name"}</th><th>{"FB Size"}</th><th>{"Pack"}</th><th>{"Assigned user"}</th><th>{"Actions"}</th></tr>
                    </thead>
                    <tbody>
                        { for boards.iter().map(|b| {
                            let (open, board) = (open.clone(), b.clone());
                            html! {
                                <tr key={b.id.unwrap_or_default()}>
                                    <td>{ text_or_dash(b.fb_name.as_deref()) }</td>
                                    <td>{ text_or_dash(b.fb_size.as_deref()) }</td>
                                    <td>{ pack_name(b.pack_id) }</td>
                                    <td>{ user_name(&users, b.assigned_user_id) }</td>
                                    <td class="actions">
                                        <button onclick={move |_| open.emit(board.clone())}>{"Assign"}</button>
                                    </td>
                                </tr>
                            }
                        }) }
                    </tbody>
                </table>
            }

            if let Some(current) = (*assigning).clone() {
                <div class="modal-backdrop">
                    <div class="modal">
                        <h2>{ format!("Assign {}", current.board.label()) }</h2>
                        <div class="form-grid">
                            <label>{"Pack"}
                                <select onchange={edit(|a, v| a.pack = v)}>
                                    <option value="" selected={current.pack.is_empty()}>{"None"}</option>
                                    { for packs.iter().filter_map(|p| p.id.map(|id| (id, p))).map(|(id, p)| html! {
                                        <option value={id.to_string()} selected={current.pack == id.to_string()}>{ p.label() }</option>
                                    }) }
                                </select>
                            </label>
                            <label>{"Technician"}
                                <select onchange={edit(|a, v| a.user = v)}>
                                    <option value="" selected={current.user.is_empty()}>{"Unassigned"}</option>
                                    { for users.iter().map(|u| html! {
                                        <option value={u.id.to_string()} selected={current.user == u.id.to_string()}>
                                            { text_or_dash(u.username.as_deref()) }
                                        </option>
                                    }) }
                                </select>
                            </label>
                        </div>
                        <div class="form-actions">
                            <button class="primary" onclick={on_save}>{"Save"}</button>
                            <button onclick={let assigning = assigning.clone(); move |_| assigning.set(None)}>{"Cancel"}</button>
                        </div>
                    </div>
                </div>
            }
        </section>
    }
}

/* -------------------------------------------------------------------------- */
/*                                 planning                                   */
/* -------------------------------------------------------------------------- */

#[function_component(ScheduleTab)]
fn schedule_tab() -> Html {
    let api = use_api();
    let notifier = use_notifier();

    let sites = use_state(Vec::<Site>::new);
    let site_id = use_state(|| None::<i64>);
    let packs = use_state(Vec::<Pack>::new);
    let grid = use_state(ScheduleGrid::default);

    /* sites + affectations existantes */
    {
        let (api, notifier, sites, grid) = (api.clone(), notifier.clone(), sites.clone(), grid.clone());
        use_effect_with((), move |_| {
            spawn_local(async move {
                let (s, entries) = futures::join!(
                    api.get::<Vec<Site>>("/sites"),
                    api.get::<Vec<ScheduleEntry>>("/maintenance-schedules"),
                );
                match s {
                    Ok(s) => sites.set(s),
                    Err(e) => notifier.error(failure_text(&e, "Failed to fetch sites.")),
                }
                match entries {
                    Ok(entries) => grid.set(ScheduleGrid::from_entries(&entries)),
                    Err(e) => notifier.error(failure_text(&e, "Failed to fetch schedules.")),
                }
            });
            || ()
        });
    }

    /* packs du site choisi */
    {
        let (api, notifier, packs) = (api.clone(), notifier.clone(), packs.clone());
        use_effect_with(*site_id, move |site_id| {
            match *site_id {
                None => packs.set(Vec::new()),
                Some(id) => spawn_local(async move {
                    match api.get::<Vec<Pack>>(&format!("/packs/site/{id}")).await {
                        Ok(list) => packs.set(list),
                        Err(e) => notifier.error(failure_text(&e, "Failed to fetch site packs.")),
                    }
                }),
            }
            || ()
        });
    }

    let on_site = {
        let site_id = site_id.clone();
        Callback::from(move |e: Event| site_id.set(input_value(&e).parse().ok()))
    };

    let on_cell = {
        let (grid, site_id) = (grid.clone(), site_id.clone());
        Callback::from(move |cell: Cell| {
            let Some(site) = *site_id else { return };
            let (api, notifier, grid) = (api.clone(), notifier.clone(), grid.clone());
            if cell.assigned {
                if !confirm(&format!("Unassign this pack from week {}?", cell.week)) {
                    return;
                }
                spawn_local(async move {
                    let body = Unassign { site_id: site, pack_id: cell.pack_id, week_number: cell.week };
                    match api.delete_with("/maintenance-schedules", &body).await {
                        Ok(()) => {
                            let mut next = (*grid).clone();
                            next.unassign(site, cell.pack_id, cell.week);
                            grid.set(next);
                            notifier.success("Pack unassigned from week successfully!");
                        }
                        Err(e) => notifier.error(failure_text(&e, "Failed to unassign pack from week.")),
                    }
                });
            } else {
                spawn_local(async move {
                    let entry = ScheduleEntry {
                        site_id: site,
                        pack_id: cell.pack_id,
                        week_number: cell.week,
                        year: Some(current_year()),
                    };
                    match api.post_unit("/maintenance-schedules", &entry).await {
                        Ok(()) => {
                            let mut next = (*grid).clone();
                            next.assign(site, cell.pack_id, cell.week);
                            grid.set(next);
                            notifier.success("Pack assigned to week successfully!");
                        }
                        Err(e) => notifier.error(failure_text(&e, "Failed to assign pack to week.")),
                    }
                });
            }
        })
    };

    html! {
        <section>
            <div class="toolbar">
                <select onchange={on_site}>
                    <option value="" selected={site_id.is_none()}>{"Select a site"}</option>
                    { for sites.iter().filter_map(|s| s.id.map(|id| (id, s))).map(|(id, s)| html! {
                        <option value={id.to_string()} selected={*site_id == Some(id)}>{ s.label() }</option>
                    }) }
                </select>
            </div>
            if let Some(id) = *site_id {
                <ScheduleTable site_id={id} packs={(*packs).clone()} grid={(*grid).clone()} {on_cell} />
            } else {
                <p class="empty">{"Select a site to see its schedule."}</p>
            }
        </section>
    }
}

/* -------------------------------------------------------------------------- */
/*                                   page                                     */
/* -------------------------------------------------------------------------- */

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Tab {
    Sites,
    Packs,
    Projects,
    Boards,
    Schedule,
}

const TABS: [(Tab, &str); 5] = [
    (Tab::Sites, "Sites"),
    (Tab::Packs, "Packs"),
    (Tab::Projects, "Projects"),
    (Tab::Boards, "Board assignment"),
    (Tab::Schedule, "Schedule"),
];

#[function_component(PreventiveAdmin)]
pub fn preventive_admin() -> Html {
    let tab = use_state(|| Tab::Schedule);

    html! {
        <div class="page">
            <h1>{"Preventive Maintenance Administration"}</h1>
            <div class="tabs">
                { for TABS.iter().map(|(t, label)| {
                    let (t, setter) = (*t, tab.clone());
                    html! {
                        <button class={classes!("tab", (*tab == t).then_some("selected"))} onclick={move |_| setter.set(t)}>
                            { *label }
                        </button>
                    }
                }) }
            </div>
            {
                match *tab {
                    Tab::Sites => html!(<RecordTab key="sites" kind={RecordKind::Site} />),
                    Tab::Packs => html!(<RecordTab key="packs" kind={RecordKind::Pack} />),
                    Tab::Projects => html!(<RecordTab key="projects" kind={RecordKind::Project} />),
                    Tab::Boards => html!(<AssignmentTab />),
                    Tab::Schedule => html!(<ScheduleTab />),
                }
            }
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(name: &str, location: &str, site: &str, year: &str) -> RecordDraft {
        RecordDraft {
            name: name.into(),
            location: location.into(),
            site_id: site.into(),
            year: year.into(),
        }
    }

    #[test]
    fn site_needs_only_a_name() {
        let site = draft(" Tanger ", "", "", "").apply(RecordKind::Site, NamedRecord::default()).unwrap();
        assert_eq!(site.name.as_deref(), Some("Tanger"));
        assert_eq!(site.location, None);
        assert_eq!(site.site_id, None);

        assert_eq!(
            draft("  ", "", "", "").apply(RecordKind::Site, NamedRecord::default()),
            Err(RecordError::MissingName)
        );
    }

    #[test]
    fn pack_and_project_need_a_site() {
        assert_eq!(
            draft("P1", "", "", "").apply(RecordKind::Pack, NamedRecord::default()),
            Err(RecordError::MissingSite)
        );
        let pack = draft("P1", "ignored", "4", "").apply(RecordKind::Pack, NamedRecord::default()).unwrap();
        assert_eq!(pack.site_id, Some(4));
        assert_eq!(pack.location, None);

        assert_eq!(
            draft("X", "", "4", "soon").apply(RecordKind::Project, NamedRecord::default()),
            Err(RecordError::BadYear)
        );
        let project = draft("X", "", "4", "2025").apply(RecordKind::Project, NamedRecord::default()).unwrap();
        assert_eq!(project.year, Some(2025));
    }

    #[test]
    fn editing_keeps_id_and_unknown_fields() {
        let mut base = NamedRecord { id: Some(9), name: Some("Old".into()), ..Default::default() };
        base.extra.insert("code".into(), "T1".into());
        let site = draft("New", "Zone A", "", "").apply(RecordKind::Site, base).unwrap();
        assert_eq!(site.id, Some(9));
        assert_eq!(site.location.as_deref(), Some("Zone A"));
        assert_eq!(site.extra["code"], "T1");
    }

    #[test]
    fn assignment_replaces_only_links() {
        let board = Board {
            id: Some(1),
            fb_name: Some("FB".into()),
            pack_id: Some(3),
            assigned_user_id: Some(7),
            ..Default::default()
        };
        let updated = with_assignment(board.clone(), "5", "");
        assert_eq!(updated.pack_id, Some(5));
        assert_eq!(updated.assigned_user_id, None);
        assert_eq!(updated.fb_name, board.fb_name);
    }

    #[test]
    fn lookup_labels() {
        let users = vec![UserSummary { id: 2, username: Some("amine".into()), matricule: None }];
        assert_eq!(user_name(&users, Some(2)), "amine");
        assert_eq!(user_name(&users, Some(3)), "Unassigned");
        assert_eq!(user_name(&users, None), "Unassigned");

        let sites = vec![NamedRecord { id: Some(1), name: Some("Tanger".into()), ..Default::default() }];
        assert_eq!(site_name(&sites, Some(1)), "Tanger");
        assert_eq!(site_name(&sites, Some(5)), "N/A");
    }
}
