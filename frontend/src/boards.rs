//! Fixture board inventory (admin).

use log::{error, info};
use thiserror::Error;
use yew::platform::spawn_local;
use yew::prelude::*;

use crate::config::SEARCH_MIN_LEN;
use crate::models::Board;
use crate::notice::use_notifier;
use crate::session::use_api;
use crate::utils::{confirm, contains_ci, failure_text, input_checked, input_value, search_needle, text_or_dash};

/* -------------------------------------------------------------------------- */
/*                               filtres & résumé                              */
/* -------------------------------------------------------------------------- */

#[derive(Clone, Debug, Default, PartialEq)]
pub struct BoardFilter {
    pub text: String,
    pub projet: String,
    pub plant: String,
    pub fb_type1: String,
}

fn exact(wanted: &str, value: &Option<String>) -> bool {
    wanted.is_empty() || value.as_deref() == Some(wanted)
}

impl BoardFilter {
    pub fn matches(&self, b: &Board) -> bool {
        let text_ok = match search_needle(&self.text, SEARCH_MIN_LEN) {
            None => true,
            Some(needle) => [&b.fb_name, &b.fb_id, &b.projet, &b.plant, &b.area]
                .into_iter()
                .any(|f| contains_ci(f.as_deref(), &needle)),
        };
        text_ok && exact(&self.projet, &b.projet) && exact(&self.plant, &b.plant) && exact(&self.fb_type1, &b.fb_type1)
    }

    pub fn apply(&self, boards: &[Board]) -> Vec<Board> {
        boards.iter().filter(|b| self.matches(b)).cloned().collect()
    }
}

/// Number of boards per projet, in first-seen order.
pub fn count_per_projet(boards: &[Board]) -> Vec<(String, usize)> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    for b in boards {
        let projet = match b.projet.as_deref().map(str::trim) {
            Some(p) if !p.is_empty() => p.to_string(),
            _ => "Undefined".to_string(),
        };
        match counts.iter_mut().find(|(p, _)| *p == projet) {
            Some((_, n)) => *n += 1,
            None => counts.push((projet, 1)),
        }
    }
    counts
}

/* -------------------------------------------------------------------------- */
/*                                  brouillon                                  */
/* -------------------------------------------------------------------------- */

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BoardError {
    #[error("FB Name is required")]
    MissingName,
    #[error("{0} must be a number")]
    NotANumber(&'static str),
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct BoardDraft {
    pub fb_name: String,
    pub fb_id: String,
    pub fb_size: String,
    pub projet: String,
    pub plant: String,
    pub area: String,
    pub fb_type1: String,
    pub side: String,
    pub current_tech_level: String,
    pub storage_place: String,
    pub in_use: String,
    pub test_clip: bool,
    pub cost: String,
    pub quantity: String,
    pub comment1: String,
}

#[derive(Clone, Copy)]
enum BoardField {
    Name,
    FbId,
    Size,
    Projet,
    Plant,
    Area,
    Type1,
    Side,
    TechLevel,
    Storage,
    InUse,
    Cost,
    Quantity,
    Comment,
}

const FORM_FIELDS: [(&str, BoardField); 14] = [
    ("FB Name", BoardField::Name),
    ("FB ID", BoardField::FbId),
    ("FB Size", BoardField::Size),
    ("Projet", BoardField::Projet),
    ("Plant", BoardField::Plant),
    ("Area", BoardField::Area),
    ("FB Type 1", BoardField::Type1),
    ("Side", BoardField::Side),
    ("Current Tech Level", BoardField::TechLevel),
    ("Storage Place", BoardField::Storage),
    ("In Use", BoardField::InUse),
    ("Cost", BoardField::Cost),
    ("Quantity", BoardField::Quantity),
    ("Comment", BoardField::Comment),
];

fn optional(raw: &str) -> Option<String> {
    let raw = raw.trim();
    (!raw.is_empty()).then(|| raw.to_string())
}

fn number<T: std::str::FromStr>(raw: &str, name: &'static str) -> Result<Option<T>, BoardError> {
    match optional(raw) {
        None => Ok(None),
        Some(v) => v.replace(',', ".").parse().map(Some).map_err(|_| BoardError::NotANumber(name)),
    }
}

impl BoardDraft {
    pub fn from_board(b: &Board) -> Self {
        let t = |v: &Option<String>| v.clone().unwrap_or_default();
        Self {
            fb_name: t(&b.fb_name),
            fb_id: t(&b.fb_id),
            fb_size: t(&b.fb_size),
            projet: t(&b.projet),
            plant: t(&b.plant),
            area: t(&b.area),
            fb_type1: t(&b.fb_type1),
            side: t(&b.side),
            current_tech_level: t(&b.current_tech_level),
            storage_place: t(&b.storage_place),
            in_use: t(&b.in_use),
            test_clip: b.test_clip.unwrap_or(false),
            cost: b.cost.map(|c| c.to_string()).unwrap_or_default(),
            quantity: b.quantity.map(|q| q.to_string()).unwrap_or_default(),
            comment1: t(&b.comment1),
        }
    }

    fn slot(&mut self, field: BoardField) -> &mut String {
        match field {
            BoardField::Name => &mut self.fb_name,
            BoardField::FbId => &mut self.fb_id,
            BoardField::Size => &mut self.fb_size,
            BoardField::Projet => &mut self.projet,
            BoardField::Plant => &mut self.plant,
            BoardField::Area => &mut self.area,
            BoardField::Type1 => &mut self.fb_type1,
            BoardField::Side => &mut self.side,
            BoardField::TechLevel => &mut self.current_tech_level,
            BoardField::Storage => &mut self.storage_place,
            BoardField::InUse => &mut self.in_use,
            BoardField::Cost => &mut self.cost,
            BoardField::Quantity => &mut self.quantity,
            BoardField::Comment => &mut self.comment1,
        }
    }

    fn value(&self, field: BoardField) -> String {
        let v = match field {
            BoardField::Name => &self.fb_name,
            BoardField::FbId => &self.fb_id,
            BoardField::Size => &self.fb_size,
            BoardField::Projet => &self.projet,
            BoardField::Plant => &self.plant,
            BoardField::Area => &self.area,
            BoardField::Type1 => &self.fb_type1,
            BoardField::Side => &self.side,
            BoardField::TechLevel => &self.current_tech_level,
            BoardField::Storage => &self.storage_place,
            BoardField::InUse => &self.in_use,
            BoardField::Cost => &self.cost,
            BoardField::Quantity => &self.quantity,
            BoardField::Comment => &self.comment1,
        };
        v.clone()
    }

    /// Only the form's fields are overwritten; the rest of `base` goes back as loaded.
    pub fn apply(&self, base: Board) -> Result<Board, BoardError> {
        let fb_name = optional(&self.fb_name).ok_or(BoardError::MissingName)?;
        Ok(Board {
            fb_name: Some(fb_name),
            fb_id: optional(&self.fb_id),
            fb_size: optional(&self.fb_size),
            projet: optional(&self.projet),
            plant: optional(&self.plant),
            area: optional(&self.area),
            fb_type1: optional(&self.fb_type1),
            side: optional(&self.side),
            current_tech_level: optional(&self.current_tech_level),
            storage_place: optional(&self.storage_place),
            in_use: optional(&self.in_use),
            test_clip: Some(self.test_clip),
            cost: number(&self.cost, "Cost")?,
            quantity: number(&self.quantity, "Quantity")?,
            comment1: optional(&self.comment1),
            ..base
        })
    }
}

/* -------------------------------------------------------------------------- */
/*                                    page                                    */
/* -------------------------------------------------------------------------- */

#[derive(Clone, PartialEq)]
struct Editing {
    base: Board,
    draft: BoardDraft,
    error: Option<String>,
}

#[function_component(BoardInventory)]
pub fn board_inventory() -> Html {
    let api = use_api();
    let notifier = use_notifier();

    let boards = use_state(Vec::<Board>::new);
    let projets = use_state(Vec::<String>::new);
    let plants = use_state(Vec::<String>::new);
    let types = use_state(Vec::<String>::new);
    let loading = use_state(|| true);
    let filter = use_state(BoardFilter::default);
    let editing = use_state(|| None::<Editing>);
    let reload = use_state(|| 0_u32);

    /* ---------------- listes de valeurs ---------------- */
    {
        let (api, notifier) = (api.clone(), notifier.clone());
        let (projets, plants, types) = (projets.clone(), plants.clone(), types.clone());
        use_effect_with((), move |_| {
            spawn_local(async move {
                let (p, pl, t) = futures::join!(
                    api.get::<Vec<String>>("/boards/projets"),
                    api.get::<Vec<String>>("/boards/plants"),
                    api.get::<Vec<String>>("/boards/fbTypes1"),
                );
                match (p, pl, t) {
                    (Ok(p), Ok(pl), Ok(t)) => {
                        projets.set(p);
                        plants.set(pl);
                        types.set(t);
                    }
                    (Err(e), _, _) | (_, Err(e), _) | (_, _, Err(e)) => {
                        notifier.error(failure_text(&e, "Failed to fetch filter options"));
                    }
                }
            });
            || ()
        });
    }

    /* ---------------- cartes ---------------- */
    {
        let (api, notifier) = (api.clone(), notifier.clone());
        let (boards, loading) = (boards.clone(), loading.clone());
        use_effect_with(*reload, move |_| {
            spawn_local(async move {
                match api.get::<Vec<Board>>("/boards").await {
                    Ok(list) => boards.set(list),
                    Err(e) => {
                        error!("boards: {e}");
                        notifier.error(failure_text(&e, "Failed to fetch boards"));
                    }
                }
                loading.set(false);
            });
            || ()
        });
    }

    let edit_filter = |apply: fn(&mut BoardFilter, String)| {
        let filter = filter.clone();
        Callback::from(move |e: Event| {
            let mut next = (*filter).clone();
            apply(&mut next, input_value(&e));
            filter.set(next);
        })
    };

    let open = {
        let editing = editing.clone();
        Callback::from(move |board: Board| {
            editing.set(Some(Editing {
                draft: BoardDraft::from_board(&board),
                base: board,
                error: None,
            }))
        })
    };

    let on_delete = {
        let (api, notifier, reload) = (api.clone(), notifier.clone(), reload.clone());
        Callback::from(move |id: i64| {
            if !confirm("Are you sure you want to delete this board?") {
                return;
            }
            let (api, notifier, reload) = (api.clone(), notifier.clone(), reload.clone());
            spawn_local(async move {
                match api.delete(&format!("/boards/{id}")).await {
                    Ok(()) => {
                        info!("board {id} deleted");
                        notifier.success("Board deleted successfully");
                        reload.set(*reload + 1);
                    }
                    Err(e) => notifier.error(failure_text(&e, "Failed to delete board")),
                }
            });
        })
    };

    let on_save = {
        let (editing, reload) = (editing.clone(), reload.clone());
        Callback::from(move |_: MouseEvent| {
            let Some(current) = (*editing).clone() else { return };
            let board = match current.draft.apply(current.base.clone()) {
                Ok(b) => b,
                Err(e) => {
                    editing.set(Some(Editing { error: Some(e.to_string()), ..current }));
                    return;
                }
            };
            let (api, notifier, editing, reload) = (api.clone(), notifier.clone(), editing.clone(), reload.clone());
            spawn_local(async move {
                let result = match board.id {
                    Some(id) => api.put_unit(&format!("/boards/{id}"), &board).await,
                    None => api.post_unit("/boards", &board).await,
                };
                match result {
                    Ok(()) => {
                        notifier.success(if board.id.is_some() { "Board updated successfully" } else { "Board created successfully" });
                        editing.set(None);
                        reload.set(*reload + 1);
                    }
                    Err(e) => notifier.error(failure_text(&e, "Failed to save board")),
                }
            });
        })
    };

    let shown = filter.apply(&boards);
    let counts = count_per_projet(&shown);
    let max_count = counts.iter().map(|(_, n)| *n).max().unwrap_or(0);

    let vocab = |label: &'static str, values: &[String], current: &str, apply: fn(&mut BoardFilter, String)| {
        html! {
            <select onchange={edit_filter(apply)}>
                <option value="" selected={current.is_empty()}>{ label }</option>
                { for values.iter().map(|v| html!(<option value={v.clone()} selected={current == v.as_str()}>{ v }</option>)) }
            </select>
        }
    };

    html! {
        <div class="page">
            <h1>{"Board Inventory"}</h1>
            <div class="toolbar">
                <input type="search" class="search" placeholder="Search by FB name, ID, projet, plant or area"
                       value={filter.text.clone()} onchange={edit_filter(|f, v| f.text = v)} />
                { vocab("All projets", &projets, &filter.projet, |f, v| f.projet = v) }
                { vocab("All plants", &plants, &filter.plant, |f, v| f.plant = v) }
                { vocab("All FB types", &types, &filter.fb_type1, |f, v| f.fb_type1 = v) }
                <button class="primary" onclick={let open = open.clone(); move |_| open.emit(Board::default())}>{"Add Board"}</button>
            </div>

            <div class="chart-card">
                <h3>{"Boards per projet"}</h3>
                <table class="bar-table">
                    <tbody>
                        { for counts.iter().map(|(projet, n)| {
                            let width = if max_count > 0 { *n as f64 / max_count as f64 * 100.0 } else { 0.0 };
                            html! {
                                <tr>
                                    <td class="bar-label">{ projet }</td>
                                    <td class="bar-cell"><div class="bar" style={format!("width:{width:.1}%")}></div></td>
                                    <td class="bar-value">{ n }</td>
                                </tr>
                            }
                        }) }
                    </tbody>
                </table>
            </div>

            if *loading {
                <p class="loading">{"Loading…"}</p>
            } else if shown.is_empty() {
                <p class="empty">{"No boards found."}</p>
            } else {
                <table class="data-table">
                    <thead>
                        <tr>
                            <th>{"FB Name"}</th><th>{"FB ID"}</th><th>{"Projet"}</th><th>{"Plant"}</th>
                            <th>{"Area"}</th><th>{"FB Type 1"}</th><th>{"Side"}</th><th>{"Tech Level"}</th>
                            <th>{"Storage"}</th><th>{"Qty"}</th><th>{"Actions"}</th>
                        </tr>
                    </thead>
                    <tbody>
                        { for shown.iter().map(|b| {
                            let id = b.id.unwrap_or_default();
                            let (open, on_delete, board) = (open.clone(), on_delete.clone(), b.clone());
                            html! {
                                <tr key={id}>
                                    <td>{ text_or_dash(b.fb_name.as_deref()) }</td>
                                    <td>{ text_or_dash(b.fb_id.as_deref()) }</td>
                                    <td>{ text_or_dash(b.projet.as_deref()) }</td>
                                    <td>{ text_or_dash(b.plant.as_deref()) }</td>
                                    <td>{ text_or_dash(b.area.as_deref()) }</td>
                                    <td>{ text_or_dash(b.fb_type1.as_deref()) }</td>
                                    <td>{ text_or_dash(b.side.as_deref()) }</td>
                                    <td>{ text_or_dash(b.current_tech_level.as_deref()) }</td>
                                    <td>{ text_or_dash(b.storage_place.as_deref()) }</td>
                                    <td>{ b.quantity.unwrap_or(0) }</td>
                                    <td class="actions">
                                        <button onclick={move |_| open.emit(board.clone())}>{"Edit"}</button>
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
                        <h2>{ if current.base.id.is_some() { "Edit Board" } else { "Add Board" } }</h2>
                        <div class="form-grid">
                            { for FORM_FIELDS.iter().map(|(label, f)| {
                                let f = *f;
                                let editing = editing.clone();
                                let onchange = Callback::from(move |e: Event| {
                                    if let Some(mut next) = (*editing).clone() {
                                        *next.draft.slot(f) = input_value(&e);
                                        editing.set(Some(next));
                                    }
                                });
                                html! {
                                    <label>{ *label }
                                        <input value={current.draft.value(f)} {onchange} />
                                    </label>
                                }
                            }) }
                            <label class="checkbox">
                                <input type="checkbox" checked={current.draft.test_clip}
                                       onchange={let editing = editing.clone(); move |e: Event| {
                                           if let Some(mut next) = (*editing).clone() {
                                               next.draft.test_clip = input_checked(&e);
                                               editing.set(Some(next));
                                           }
                                       }} />
                                {"Test Clip"}
                            </label>
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
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(id: i64, name: &str, projet: Option<&str>, plant: &str) -> Board {
        Board {
            id: Some(id),
            fb_name: Some(name.into()),
            projet: projet.map(Into::into),
            plant: Some(plant.into()),
            ..Default::default()
        }
    }

    #[test]
    fn text_and_exact_filters() {
        let boards = vec![
            board(1, "FB-KHM-01", Some("P1"), "Tanger"),
            board(2, "FB-X", Some("P2"), "Tanger"),
            board(3, "FB-KHM-02", Some("P2"), "Kenitra"),
        ];
        let ids = |f: BoardFilter| f.apply(&boards).iter().filter_map(|b| b.id).collect::<Vec<_>>();

        assert_eq!(ids(BoardFilter { text: "khm".into(), ..Default::default() }), vec![1, 3]);
        assert_eq!(ids(BoardFilter { projet: "P2".into(), ..Default::default() }), vec![2, 3]);
        assert_eq!(
            ids(BoardFilter { projet: "P2".into(), plant: "Tanger".into(), ..Default::default() }),
            vec![2]
        );
        assert_eq!(ids(BoardFilter { text: "k".into(), ..Default::default() }), vec![1, 2, 3]);
    }

    #[test]
    fn counts_per_projet() {
        let boards = vec![
            board(1, "a", Some("P2"), "x"),
            board(2, "b", None, "x"),
            board(3, "c", Some("P2"), "x"),
        ];
        assert_eq!(
            count_per_projet(&boards),
            vec![("P2".to_string(), 2), ("Undefined".to_string(), 1)]
        );
    }

    #[test]
    fn draft_preserves_other_fields() {
        let mut base = board(5, "Old", Some("P1"), "T");
        base.pack_id = Some(4);
        base.extra.insert("firstTechLevel".into(), "L1".into());
        let mut draft = BoardDraft::from_board(&base);
        draft.fb_name = "New".into();
        draft.quantity = "3".into();
        let out = draft.apply(base).unwrap();
        assert_eq!(out.fb_name.as_deref(), Some("New"));
        assert_eq!(out.quantity, Some(3));
        assert_eq!(out.pack_id, Some(4));
        assert_eq!(out.extra["firstTechLevel"], "L1");

        let bad = BoardDraft { fb_name: "x".into(), cost: "abc".into(), ..Default::default() };
        assert_eq!(bad.apply(Board::default()), Err(BoardError::NotANumber("Cost")));
        assert_eq!(BoardDraft::default().apply(Board::default()), Err(BoardError::MissingName));
    }
}
