//! Bills of materials per board.

use log::{debug, error, info};
use serde::Serialize;
use thiserror::Error;
use yew::platform::spawn_local;
use yew::prelude::*;

use crate::api::ApiError;
use crate::config::MAX_BOM_UNITS;
use crate::models::{Board, Bom, BomLine, InventoryItem};
use crate::notice::use_notifier;
use crate::session::use_api;
use crate::utils::{failure_text, format_money, input_value, parse_or, text_or_dash};

pub const CATEGORIES: [&str; 8] = [
    "holder 2d",
    "holder 3d",
    "em",
    "screw",
    "khm",
    "accessoire",
    "clipheads",
    "autre",
];

/* -------------------------------------------------------------------------- */
/*                              tenue des lignes                              */
/* -------------------------------------------------------------------------- */

#[derive(Debug, Error, PartialEq, Eq)]
pub enum QuantityError {
    #[error("Quantity must be a whole number.")]
    NotANumber,
    #[error("Quantity cannot exceed {} units.", MAX_BOM_UNITS)]
    TooLarge,
}

/// Quantity typed in the line editor.
pub fn parse_quantity(raw: &str) -> Result<u32, QuantityError> {
    let q: u32 = raw.trim().parse().map_err(|_| QuantityError::NotANumber)?;
    if q > MAX_BOM_UNITS {
        return Err(QuantityError::TooLarge);
    }
    Ok(q)
}

fn default_unit_name(n: usize) -> String {
    format!("Unit {n}")
}

impl BomLine {
    /// Unsaved line: one unit, nothing picked yet.
    pub fn blank() -> Self {
        BomLine {
            quantity: 1,
            unit_names: vec![default_unit_name(1)],
            ..Default::default()
        }
    }

    fn refresh_cost(&mut self) {
        self.line_cost = self.unit_price * f64::from(self.quantity);
    }

    /// Picking a stock item names the component and prices the line.
    pub fn pick_item(&mut self, item: &InventoryItem) {
        self.inventory_item_id = item.id;
        self.component_name = item.ref_code.clone().unwrap_or_default();
        self.unit_price = item.price.unwrap_or(0.0);
        self.refresh_cost();
    }

    /// New units get a default name, extra ones are dropped from the end.
    /// Capped at [`MAX_BOM_UNITS`].
    pub fn set_quantity(&mut self, quantity: u32) {
        let quantity = quantity.min(MAX_BOM_UNITS);
        let wanted = quantity as usize;
        let have = self.unit_names.len();
        if wanted > have {
            self.unit_names.extend((have + 1..=wanted).map(default_unit_name));
        } else {
            self.unit_names.truncate(wanted);
        }
        self.quantity = quantity;
        self.refresh_cost();
    }

    /// One name per unit (blank padding) and a cost matching price × quantity.
    /// Quantities loaded above [`MAX_BOM_UNITS`] are capped.
    pub fn normalized(&self) -> BomLine {
        let mut line = self.clone();
        line.quantity = line.quantity.min(MAX_BOM_UNITS);
        line.unit_names.resize(line.quantity as usize, String::new());
        line.refresh_cost();
        line
    }
}

pub fn total_cost(lines: &[BomLine]) -> f64 {
    lines.iter().map(|l| l.unit_price * f64::from(l.quantity)).sum()
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct NewBom<'a> {
    board_id: i64,
    bom_lines: &'a [BomLine],
    total_cost: f64,
}

/// Loaded BOM for a board; a 404 means the board has none yet.
async fn fetch_bom(api: &crate::api::Api, board_id: i64) -> Result<Option<Bom>, ApiError> {
    match api.get::<Bom>(&format!("/boms/board/{board_id}")).await {
        Ok(bom) => Ok(Some(bom)),
        Err(ApiError::NotFound) => {
            debug!("no BOM for board {board_id}");
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

/* -------------------------------------------------------------------------- */
/*                                    page                                    */
/* -------------------------------------------------------------------------- */

#[function_component(BomManagement)]
pub fn bom_management() -> Html {
    let api = use_api();
    let notifier = use_notifier();

    let boards = use_state(Vec::<Board>::new);
    let inventory = use_state(Vec::<InventoryItem>::new);
    let selected = use_state(|| None::<i64>);
    let bom = use_state(|| None::<Bom>);
    let lines = use_state(Vec::<BomLine>::new);
    let loading = use_state(|| false);
    let naming = use_state(|| None::<(usize, Vec<String>)>);
    let reload = use_state(|| 0_u32);

    /* ---------------- cartes et stock ---------------- */
    {
        let (api, notifier) = (api.clone(), notifier.clone());
        let (boards, inventory) = (boards.clone(), inventory.clone());
        use_effect_with((), move |_| {
            spawn_local(async move {
                let (b, inv) = futures::join!(
                    api.get::<Vec<Board>>("/boards"),
                    api.get::<Vec<InventoryItem>>("/inventory"),
                );
                match b {
                    Ok(list) => boards.set(list),
                    Err(e) => notifier.error(failure_text(&e, "Failed to fetch boards")),
                }
                match inv {
                    Ok(list) => inventory.set(list),
                    Err(e) => notifier.error(failure_text(&e, "Failed to fetch inventory items")),
                }
            });
            || ()
        });
    }

    /* ---------------- BOM de la carte choisie ---------------- */
    {
        let (api, notifier) = (api.clone(), notifier.clone());
        let (bom, lines, loading) = (bom.clone(), lines.clone(), loading.clone());
        use_effect_with((*selected, *reload), move |(selected, _)| {
            if let Some(board_id) = *selected {
                loading.set(true);
                spawn_local(async move {
                    match fetch_bom(&api, board_id).await {
                        Ok(found) => {
                            lines.set(
                                found
                                    .as_ref()
                                    .map(|b| b.bom_lines.iter().map(BomLine::normalized).collect())
                                    .unwrap_or_default(),
                            );
                            bom.set(found);
                        }
                        Err(e) => {
                            error!("bom of board {board_id}: {e}");
                            notifier.error(failure_text(&e, "Failed to fetch BOM"));
                        }
                    }
                    loading.set(false);
                });
            }
            || ()
        });
    }

    let edit_line = {
        let lines = lines.clone();
        move |index: usize, change: Box<dyn Fn(&mut BomLine)>| {
            let mut next = (*lines).clone();
            if let Some(line) = next.get_mut(index) {
                change(line);
            }
            lines.set(next);
        }
    };

    let add_line = {
        let lines = lines.clone();
        Callback::from(move |_: MouseEvent| {
            let mut next = (*lines).clone();
            next.push(BomLine::blank());
            lines.set(next);
        })
    };

    let on_save = {
        let notifier = notifier.clone();
        let (selected, bom, lines, reload) = (selected.clone(), bom.clone(), lines.clone(), reload.clone());
        Callback::from(move |_: MouseEvent| {
            let Some(board_id) = *selected else {
                notifier.warn("Please select a board first");
                return;
            };
            let payload: Vec<BomLine> = lines.iter().map(BomLine::normalized).collect();
            let bom_id = bom.as_ref().map(|b| b.id);
            let (api, notifier, reload) = (api.clone(), notifier.clone(), reload.clone());
            spawn_local(async move {
                let result = match bom_id {
                    Some(id) => api.post_unit(&format!("/boms/{id}/lines"), &payload).await,
                    None => {
                        let body = NewBom {
                            board_id,
                            total_cost: total_cost(&payload),
                            bom_lines: &payload,
                        };
                        api.post_unit(&format!("/boms/board/{board_id}"), &body).await
                    }
                };
                match result {
                    Ok(()) => {
                        info!("BOM of board {board_id} saved ({} lines)", payload.len());
                        notifier.success("BOM saved successfully");
                        reload.set(*reload + 1);
                    }
                    Err(e) => notifier.error(failure_text(&e, "Failed to save BOM")),
                }
            });
        })
    };

    let total = total_cost(&lines);

    html! {
        <div class="page">
            <h1>{"BOM Management"}</h1>

            <h3>{"Select Board"}</h3>
            <table class="data-table compact">
                <thead><tr><th>{"Board ID"}</th><th>{"FB Name"}</th><th>{"Projet"}</th><th>{"Actions"}</th></tr></thead>
                <tbody>
                    if boards.is_empty() {
                        <tr><td colspan="4" class="empty">{"No boards available."}</td></tr>
                    }
                    { for boards.iter().map(|b| {
                        let id = b.id.unwrap_or_default();
                        let selected = selected.clone();
                        let active = *selected == Some(id);
                        html! {
                            <tr key={id} class={classes!(active.then_some("selected"))}>
                                <td>{ text_or_dash(b.fb_id.as_deref()) }</td>
                                <td>{ text_or_dash(b.fb_name.as_deref()) }</td>
                                <td>{ text_or_dash(b.projet.as_deref()) }</td>
                                <td><button onclick={move |_| selected.set(Some(id))}>{"Select"}</button></td>
                            </tr>
                        }
                    }) }
                </tbody>
            </table>

            if selected.is_some() {
                <div class="bom-editor">
                    <div class="toolbar">
                        <h3>{ if bom.is_some() { "BOM lines" } else { "New BOM" } }</h3>
                        <button onclick={add_line}>{"Add Line"}</button>
                        <button class="primary" onclick={on_save} disabled={*loading}>{"Save BOM"}</button>
                    </div>
                    if *loading {
                        <p class="loading">{"Loading…"}</p>
                    } else if lines.is_empty() {
                        <p class="empty">{"No lines yet."}</p>
                    } else {
                        <table class="data-table">
                            <thead>
                                <tr>
                                    <th>{"Category"}</th><th>{"Inventory item"}</th><th>{"Component"}</th>
                                    <th>{"Unit price"}</th><th>{"Quantity"}</th><th>{"Line cost"}</th>
                                    <th>{"Units"}</th><th>{"Actions"}</th>
                                </tr>
                            </thead>
                            <tbody>
                                { for lines.iter().enumerate().map(|(index, line)| {
                                    let on_category = {
                                        let edit = edit_line.clone();
                                        Callback::from(move |e: Event| {
                                            let value = input_value(&e);
                                            edit(index, Box::new(move |l: &mut BomLine| l.category = value.clone()));
                                        })
                                    };
                                    let on_item = {
                                        let edit = edit_line.clone();
                                        let inventory = inventory.clone();
                                        Callback::from(move |e: Event| {
                                            let id: i64 = parse_or(&input_value(&e), -1);
                                            if let Some(item) = inventory.iter().find(|i| i.id == Some(id)).cloned() {
                                                edit(index, Box::new(move |l: &mut BomLine| l.pick_item(&item)));
                                            }
                                        })
                                    };
                                    let on_quantity = {
                                        let (edit, notifier) = (edit_line.clone(), notifier.clone());
                                        Callback::from(move |e: Event| match parse_quantity(&input_value(&e)) {
                                            Ok(q) => edit(index, Box::new(move |l: &mut BomLine| l.set_quantity(q))),
                                            Err(err) => notifier.error(err.to_string()),
                                        })
                                    };
                                    let on_remove = {
                                        let lines = lines.clone();
                                        Callback::from(move |_: MouseEvent| {
                                            let mut next = (*lines).clone();
                                            next.remove(index);
                                            lines.set(next);
                                        })
                                    };
                                    let on_names = {
                                        let naming = naming.clone();
                                        let names = line.normalized().unit_names;
                                        Callback::from(move |_: MouseEvent| naming.set(Some((index, names.clone()))))
                                    };
                                    let picked = line.inventory_item_id.unwrap_or(-1);
                                    html! {
                                        <tr>
                                            <td>
                                                <select onchange={on_category}>
                                                    <option value="" selected={line.category.is_empty()}>{"-"}</option>
                                                    { for CATEGORIES.iter().map(|c| html!(<option value={*c} selected={line.category == *c}>{ *c }</option>)) }
                                                </select>
                                            </td>
                                            <td>
                                                <select onchange={on_item}>
                                                    <option value="" selected={picked < 0}>{"-- pick --"}</option>
                                                    { for inventory.iter().filter_map(|i| i.id.map(|id| (id, i))).map(|(id, i)| html! {
                                                        <option value={id.to_string()} selected={picked == id}>
                                                            { text_or_dash(i.ref_code.as_deref()) }
                                                        </option>
                                                    }) }
                                                </select>
                                            </td>
                                            <td>{ text_or_dash(Some(line.component_name.as_str())) }</td>
                                            <td>{ format_money(line.unit_price) }</td>
                                            <td><input type="number" min="0" max={MAX_BOM_UNITS.to_string()} value={line.quantity.to_string()} onchange={on_quantity} /></td>
                                            <td>{ format_money(line.unit_price * f64::from(line.quantity)) }</td>
                                            <td><button onclick={on_names}>{ format!("{} names", line.unit_names.len()) }</button></td>
                                            <td><button class="danger" onclick={on_remove}>{"Delete"}</button></td>
                                        </tr>
                                    }
                                }) }
                            </tbody>
                        </table>
                        <p class="total">{ format!("Total cost: {}", format_money(total)) }</p>
                    }
                </div>
            }

            if let Some((index, names)) = (*naming).clone() {
                <div class="modal-backdrop">
                    <div class="modal">
                        <h2>{"Assign Unit Names"}</h2>
                        { for names.iter().enumerate().map(|(k, name)| {
                            let naming = naming.clone();
                            let onchange = Callback::from(move |e: Event| {
                                if let Some((i, mut names)) = (*naming).clone() {
                                    names[k] = input_value(&e);
                                    naming.set(Some((i, names)));
                                }
                            });
                            html! {
                                <label>{ default_unit_name(k + 1) }
                                    <input value={name.clone()} {onchange} />
                                </label>
                            }
                        }) }
                        <div class="form-actions">
                            <button class="primary" onclick={
                                let (naming, edit, notifier) = (naming.clone(), edit_line.clone(), notifier.clone());
                                move |_| {
                                    let names = names.clone();
                                    edit(index, Box::new(move |l: &mut BomLine| {
                                        l.unit_names = names.clone();
                                        *l = l.normalized();
                                    }));
                                    notifier.success("Unit names updated successfully");
                                    naming.set(None);
                                }
                            }>{"Save"}</button>
                            <button onclick={let naming = naming.clone(); move |_| naming.set(None)}>{"Cancel"}</button>
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

    fn stock(id: i64, code: &str, price: f64) -> InventoryItem {
        InventoryItem {
            id: Some(id),
            ref_code: Some(code.into()),
            price: Some(price),
            ..Default::default()
        }
    }

    #[test]
    fn picking_an_item_prices_the_line() {
        let mut line = BomLine::blank();
        line.set_quantity(3);
        line.pick_item(&stock(4, "KHM-SLI03", 12.5));
        assert_eq!(line.inventory_item_id, Some(4));
        assert_eq!(line.component_name, "KHM-SLI03");
        assert_eq!(line.line_cost, 37.5);
    }

    #[test]
    fn quantity_resizes_unit_names() {
        let mut line = BomLine::blank();
        line.unit_names[0] = "left clamp".into();
        line.set_quantity(3);
        assert_eq!(line.unit_names, vec!["left clamp", "Unit 2", "Unit 3"]);
        line.set_quantity(1);
        assert_eq!(line.unit_names, vec!["left clamp"]);
        line.set_quantity(0);
        assert!(line.unit_names.is_empty());
    }

    #[test]
    fn normalized_pads_names_and_fixes_cost() {
        let line = BomLine {
            unit_price: 2.0,
            quantity: 3,
            line_cost: 99.0,
            unit_names: vec!["a".into()],
            ..Default::default()
        };
        let n = line.normalized();
        assert_eq!(n.unit_names, vec!["a", "", ""]);
        assert_eq!(n.line_cost, 6.0);
    }

    #[test]
    fn quantity_is_capped() {
        let mut line = BomLine::blank();
        line.set_quantity(4_000_000_000);
        assert_eq!(line.quantity, MAX_BOM_UNITS);
        assert_eq!(line.unit_names.len(), MAX_BOM_UNITS as usize);
        assert_eq!(line.unit_names.last().map(String::as_str), Some("Unit 10000"));

        let loaded = BomLine { quantity: u32::MAX, unit_price: 1.0, ..Default::default() }.normalized();
        assert_eq!(loaded.quantity, MAX_BOM_UNITS);
        assert_eq!(loaded.unit_names.len(), MAX_BOM_UNITS as usize);
        assert_eq!(loaded.line_cost, f64::from(MAX_BOM_UNITS));
    }

    #[test]
    fn typed_quantity_is_checked() {
        assert_eq!(parse_quantity(" 12 "), Ok(12));
        assert_eq!(parse_quantity("10000"), Ok(MAX_BOM_UNITS));
        assert_eq!(parse_quantity("10001"), Err(QuantityError::TooLarge));
        assert_eq!(parse_quantity("4000000000"), Err(QuantityError::TooLarge));
        assert_eq!(parse_quantity("-1"), Err(QuantityError::NotANumber));
        assert_eq!(parse_quantity("lots"), Err(QuantityError::NotANumber));
        assert_eq!(QuantityError::TooLarge.to_string(), "Quantity cannot exceed 10000 units.");
    }

    #[test]
    fn total_is_sum_of_lines() {
        let lines = vec![
            BomLine { unit_price: 1.5, quantity: 2, ..Default::default() },
            BomLine { unit_price: 4.0, quantity: 1, ..Default::default() },
        ];
        assert_eq!(total_cost(&lines), 7.0);
        assert_eq!(total_cost(&[]), 0.0);
    }

    #[test]
    fn new_bom_body_shape() {
        let lines = vec![BomLine::blank()];
        let body = serde_json::to_value(NewBom { board_id: 3, bom_lines: &lines, total_cost: 0.0 }).unwrap();
        assert_eq!(body["boardId"], 3);
        assert_eq!(body["bomLines"][0]["unitNames"][0], "Unit 1");
        assert!(body["bomLines"][0].get("id").is_none());
    }
}
