//! Spare parts inventory: list with search and sort, admin form, quantity form.

use log::{error, info};
use thiserror::Error;
use yew::platform::spawn_local;
use yew::prelude::*;
use yew_router::prelude::*;

use crate::config::SEARCH_MIN_LEN;
use crate::models::{InventoryItem, Site};
use crate::notice::use_notifier;
use crate::role::Role;
use crate::session::{use_api, use_session};
use crate::utils::{confirm, contains_ci, failure_text, format_money, input_value, search_needle, text_or_dash};
use crate::Route;

/* -------------------------------------------------------------------------- */
/*                             filtre & tri (purs)                             */
/* -------------------------------------------------------------------------- */

/// Items whose ref code, site, type or place contain `term`. Below the minimum
/// search length the whole list is returned.
pub fn filter_items(items: &[InventoryItem], term: &str) -> Vec<InventoryItem> {
    let Some(needle) = search_needle(term, SEARCH_MIN_LEN) else {
        return items.to_vec();
    };
    items
        .iter()
        .filter(|i| {
            [&i.ref_code, &i.site, &i.kind, &i.place]
                .into_iter()
                .any(|f| contains_ci(f.as_deref(), &needle))
        })
        .cloned()
        .collect()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortKey {
    RefCode,
    Quantity,
    Price,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Sort {
    pub key: SortKey,
    pub ascending: bool,
}

impl Sort {
    /// Clicking the active column flips the direction, another column starts ascending.
    pub fn toggle(self, key: SortKey) -> Sort {
        if self.key == key {
            Sort { key, ascending: !self.ascending }
        } else {
            Sort { key, ascending: true }
        }
    }

    fn arrow(self, key: SortKey) -> &'static str {
        match (self.key == key, self.ascending) {
            (false, _) => "",
            (true, true) => " ▲",
            (true, false) => " ▼",
        }
    }
}

impl Default for Sort {
    fn default() -> Self {
        Sort { key: SortKey::RefCode, ascending: true }
    }
}

pub fn sort_items(items: &mut [InventoryItem], sort: Sort) {
    items.sort_by(|a, b| {
        let ord = match sort.key {
            SortKey::RefCode => a
                .ref_code
                .as_deref()
                .unwrap_or("")
                .to_lowercase()
                .cmp(&b.ref_code.as_deref().unwrap_or("").to_lowercase()),
            SortKey::Quantity => a.quantity.unwrap_or(0).cmp(&b.quantity.unwrap_or(0)),
            SortKey::Price => a.price.unwrap_or(0.0).total_cmp(&b.price.unwrap_or(0.0)),
        };
        if sort.ascending { ord } else { ord.reverse() }
    });
}

pub fn line_total(item: &InventoryItem) -> f64 {
    item.price.unwrap_or(0.0) * item.quantity.unwrap_or(0) as f64
}

/* -------------------------------------------------------------------------- */
/*                                brouillon                                   */
/* -------------------------------------------------------------------------- */

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ItemError {
    #[error("{0} is required")]
    Required(&'static str),
    #[error("{0} must be a number")]
    NotANumber(&'static str),
    #[error("{0} cannot be negative")]
    Negative(&'static str),
}

/// Text state of the item form.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ItemDraft {
    pub ref_code: String,
    pub site: String,
    pub kind: String,
    pub quantity: String,
    pub place: String,
    pub unit: String,
    pub price: String,
}

#[derive(Clone, Copy)]
enum ItemField {
    RefCode,
    Site,
    Kind,
    Quantity,
    Place,
    Unit,
    Price,
}

fn opt(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

fn optional(raw: &str) -> Option<String> {
    let raw = raw.trim();
    (!raw.is_empty()).then(|| raw.to_string())
}

impl ItemDraft {
    pub fn from_item(item: &InventoryItem) -> Self {
        Self {
            ref_code: opt(&item.ref_code),
            site: opt(&item.site),
            kind: opt(&item.kind),
            quantity: item.quantity.map(|q| q.to_string()).unwrap_or_default(),
            place: opt(&item.place),
            unit: opt(&item.unit),
            price: item.price.map(|p| p.to_string()).unwrap_or_default(),
        }
    }

    fn set(&mut self, field: ItemField, value: String) {
        match field {
            ItemField::RefCode => self.ref_code = value,
            ItemField::Site => self.site = value,
            ItemField::Kind => self.kind = value,
            ItemField::Quantity => self.quantity = value,
            ItemField::Place => self.place = value,
            ItemField::Unit => self.unit = value,
            ItemField::Price => self.price = value,
        }
    }

    /// Applies the draft on top of `base`, leaving its other fields as they were.
    pub fn apply(&self, base: InventoryItem) -> Result<InventoryItem, ItemError> {
        let ref_code = optional(&self.ref_code).ok_or(ItemError::Required("Ref code"))?;
        let site = optional(&self.site).ok_or(ItemError::Required("Site"))?;
        let quantity: i64 = optional(&self.quantity)
            .ok_or(ItemError::Required("Quantity"))?
            .parse()
            .map_err(|_| ItemError::NotANumber("Quantity"))?;
        if quantity < 0 {
            return Err(ItemError::Negative("Quantity"));
        }
        let price = match optional(&self.price) {
            None => None,
            Some(raw) => {
                let p: f64 = raw.replace(',', ".").parse().map_err(|_| ItemError::NotANumber("Price"))?;
                if p < 0.0 {
                    return Err(ItemError::Negative("Price"));
                }
                Some(p)
            }
        };
        Ok(InventoryItem {
            ref_code: Some(ref_code),
            site: Some(site),
            kind: optional(&self.kind),
            quantity: Some(quantity),
            place: optional(&self.place),
            unit: optional(&self.unit),
            price,
            ..base
        })
    }
}

/// Quantity form value, an integer ≥ 0.
pub fn parse_quantity(raw: &str) -> Result<i64, ItemError> {
    let q: i64 = raw.trim().parse().map_err(|_| ItemError::NotANumber("Quantity"))?;
    if q < 0 {
        return Err(ItemError::Negative("Quantity"));
    }
    Ok(q)
}

/* -------------------------------------------------------------------------- */
/*                                  liste                                     */
/* -------------------------------------------------------------------------- */

#[function_component(InventoryList)]
pub fn inventory_list() -> Html {
    let api = use_api();
    let session = use_session();
    let notifier = use_notifier();
    let navigator = use_navigator();

    let items = use_state(Vec::<InventoryItem>::new);
    let loading = use_state(|| true);
    let term = use_state(String::new);
    let sort = use_state(Sort::default);

    let is_admin = session.role() == Some(Role::Admin);

    /* ---------------- chargement ---------------- */
    {
        let api = api.clone();
        let notifier = notifier.clone();
        let items = items.clone();
        let loading = loading.clone();
        use_effect_with((), move |_| {
            spawn_local(async move {
                match api.get::<Vec<InventoryItem>>("/inventory").await {
                    Ok(list) => items.set(list),
                    Err(e) => {
                        error!("inventory: {e}");
                        notifier.error(failure_text(&e, "Failed to fetch inventory."));
                    }
                }
                loading.set(false);
            });
            || ()
        });
    }

    /* ---------------- handlers ---------------- */
    let on_delete = {
        let items = items.clone();
        Callback::from(move |id: i64| {
            if !confirm("Are you sure you want to delete this item?") {
                return;
            }
            let api = api.clone();
            let notifier = notifier.clone();
            let items = items.clone();
            spawn_local(async move {
                match api.delete(&format!("/inventory/{id}")).await {
                    Ok(()) => {
                        info!("inventory item {id} deleted");
                        let rest = items.iter().filter(|i| i.id != Some(id)).cloned().collect();
                        items.set(rest);
                        notifier.success("Item deleted successfully.");
                    }
                    Err(e) => notifier.error(failure_text(&e, "Failed to delete the item.")),
                }
            });
        })
    };

    let header = |label: &'static str, key: SortKey| {
        let arrow = sort.arrow(key);
        let sort = sort.clone();
        let onclick = Callback::from(move |_: MouseEvent| sort.set(sort.toggle(key)));
        html! { <th class="sortable" {onclick}>{ label }{ arrow }</th> }
    };

    let go = |route: Route| {
        let navigator = navigator.clone();
        Callback::from(move |_: MouseEvent| {
            if let Some(nav) = &navigator {
                nav.push(&route);
            }
        })
    };

    let mut shown = filter_items(&items, &term);
    sort_items(&mut shown, *sort);

    html! {
        <div class="page">
            <h1>{"Inventory Management"}</h1>
            <div class="toolbar">
                <input type="search" class="search"
                       placeholder="Search by ref code, site, type, or place..."
                       value={(*term).clone()}
                       oninput={let t = term.clone(); move |e: InputEvent| t.set(input_value(&e))} />
                if is_admin {
                    <button class="primary" onclick={go(Route::InventoryAdd)}>{"Add New Item"}</button>
                }
            </div>

            if *loading {
                <p class="loading">{"Loading…"}</p>
            } else if shown.is_empty() {
                <p class="empty">{"No inventory items found."}</p>
            } else {
                <table class="data-table">
                    <thead>
                        <tr>
                            <th>{"ID"}</th>
                            { header("Ref Code", SortKey::RefCode) }
                            <th>{"Site"}</th>
                            <th>{"Type"}</th>
                            { header("Quantity", SortKey::Quantity) }
                            <th>{"Place"}</th>
                            <th>{"Unit"}</th>
                            { header("Price", SortKey::Price) }
                            <th>{"Total"}</th>
                            <th>{"Actions"}</th>
                        </tr>
                    </thead>
                    <tbody>
                        { for shown.iter().map(|item| {
                            let id = item.id.unwrap_or_default();
                            let on_delete = on_delete.clone();
                            html! {
                                <tr key={id}>
                                    <td>{ id }</td>
                                    <td>{ text_or_dash(item.ref_code.as_deref()) }</td>
                                    <td>{ text_or_dash(item.site.as_deref()) }</td>
                                    <td>{ text_or_dash(item.kind.as_deref()) }</td>
                                    <td>{ item.quantity.unwrap_or(0) }</td>
                                    <td>{ text_or_dash(item.place.as_deref()) }</td>
                                    <td>{ text_or_dash(item.unit.as_deref()) }</td>
                                    <td>{ item.price.map(format_money).unwrap_or_else(|| "-".into()) }</td>
                                    <td>{ format_money(line_total(item)) }</td>
                                    <td class="actions">
                                        <button onclick={go(Route::InventoryQuantity { id })}>{"Quantity"}</button>
                                        if is_admin {
                                            <button onclick={go(Route::InventoryEdit { id })}>{"Edit"}</button>
                                            <button class="danger" onclick={move |_| on_delete.emit(id)}>{"Delete"}</button>
                                        }
                                    </td>
                                </tr>
                            }
                        }) }
                    </tbody>
                </table>
            }
        </div>
    }
}

/* -------------------------------------------------------------------------- */
/*                           formulaire création / édition                    */
/* -------------------------------------------------------------------------- */

#[derive(Properties, PartialEq)]
pub struct InventoryFormProps {
    /// `None` creates a new item.
    #[prop_or_default]
    pub id: Option<i64>,
}

#[function_component(InventoryForm)]
pub fn inventory_form(props: &InventoryFormProps) -> Html {
    let api = use_api();
    let notifier = use_notifier();
    let navigator = use_navigator();

    let base = use_state(InventoryItem::default);
    let draft = use_state(ItemDraft::default);
    let sites = use_state(Vec::<Site>::new);
    let loading = use_state(|| true);
    let saving = use_state(|| false);
    let message = use_state(String::new);

    {
        let api = api.clone();
        let notifier = notifier.clone();
        let (base, draft, sites, loading) = (base.clone(), draft.clone(), sites.clone(), loading.clone());
        use_effect_with(props.id, move |id| {
            let id = *id;
            spawn_local(async move {
                match api.get::<Vec<Site>>("/sites").await {
                    Ok(list) => sites.set(list),
                    Err(e) => notifier.error(failure_text(&e, "Failed to fetch necessary data.")),
                }
                if let Some(id) = id {
                    match api.get::<InventoryItem>(&format!("/inventory/{id}")).await {
                        Ok(item) => {
                            draft.set(ItemDraft::from_item(&item));
                            base.set(item);
                        }
                        Err(e) => notifier.error(failure_text(&e, "Failed to fetch necessary data.")),
                    }
                }
                loading.set(false);
            });
            || ()
        });
    }

    let field = |f: ItemField| {
        let draft = draft.clone();
        Callback::from(move |e: Event| {
            let mut next = (*draft).clone();
            next.set(f, input_value(&e));
            draft.set(next);
        })
    };

    let onsubmit = {
        let (draft, base, saving, message) = (draft.clone(), base.clone(), saving.clone(), message.clone());
        let navigator = navigator.clone();
        let id = props.id;
        Callback::from(move |ev: SubmitEvent| {
            ev.prevent_default();
            let item = match draft.apply((*base).clone()) {
                Ok(item) => item,
                Err(e) => {
                    message.set(e.to_string());
                    return;
                }
            };
            message.set(String::new());
            let (api, notifier, saving, navigator) = (api.clone(), notifier.clone(), saving.clone(), navigator.clone());
            saving.set(true);
            spawn_local(async move {
                let result = match id {
                    Some(id) => api.put_unit(&format!("/inventory/{id}"), &item).await,
                    None => api.post_unit("/inventory", &item).await,
                };
                saving.set(false);
                match result {
                    Ok(()) => {
                        notifier.success(if id.is_some() { "Item updated successfully." } else { "Item created successfully." });
                        if let Some(nav) = navigator {
                            nav.push(&Route::Inventory);
                        }
                    }
                    Err(e) => notifier.error(failure_text(&e, "Failed to save the inventory item.")),
                }
            });
        })
    };

    let cancel = {
        let navigator = navigator.clone();
        Callback::from(move |_: MouseEvent| {
            if let Some(nav) = &navigator {
                nav.push(&Route::Inventory);
            }
        })
    };

    if *loading {
        return html!(<p class="loading">{"Loading…"}</p>);
    }

    html! {
        <div class="page">
            <h1>{ if props.id.is_some() { "Edit Inventory Item" } else { "Add New Inventory Item" } }</h1>
            <form class="form-grid" {onsubmit}>
                <label>{"Ref Code"}
                    <input required={true} value={draft.ref_code.clone()} onchange={field(ItemField::RefCode)} />
                </label>
                <label>{"Site"}
                    <select required={true} onchange={field(ItemField::Site)}>
                        <option value="" selected={draft.site.is_empty()}>{"-- select --"}</option>
                        { for sites.iter().map(|s| html! {
                            <option value={s.label().to_string()} selected={draft.site == s.label()}>{ s.label() }</option>
                        }) }
                    </select>
                </label>
                <label>{"Type"}
                    <input value={draft.kind.clone()} onchange={field(ItemField::Kind)} />
                </label>
                <label>{"Quantity"}
                    <input type="number" min="0" required={true} value={draft.quantity.clone()} onchange={field(ItemField::Quantity)} />
                </label>
                <label>{"Place"}
                    <input value={draft.place.clone()} onchange={field(ItemField::Place)} />
                </label>
                <label>{"Unit"}
                    <input value={draft.unit.clone()} onchange={field(ItemField::Unit)} />
                </label>
                <label>{"Price (€)"}
                    <input type="number" step="0.01" min="0" value={draft.price.clone()} onchange={field(ItemField::Price)} />
                </label>
                if !message.is_empty() {
                    <p class="form-error">{ &*message }</p>
                }
                <div class="form-actions">
                    <button type="submit" class="primary" disabled={*saving}>
                        { if *saving { "Saving…" } else if props.id.is_some() { "Update Item" } else { "Create Item" } }
                    </button>
                    <button type="button" onclick={cancel}>{"Cancel"}</button>
                </div>
            </form>
        </div>
    }
}

/* -------------------------------------------------------------------------- */
/*                             mise à jour quantité                           */
/* -------------------------------------------------------------------------- */

#[derive(Properties, PartialEq)]
pub struct QuantityFormProps {
    pub id: i64,
}

/// Sends the whole item back with only the quantity changed.
#[function_component(QuantityForm)]
pub fn quantity_form(props: &QuantityFormProps) -> Html {
    let api = use_api();
    let notifier = use_notifier();
    let navigator = use_navigator();
    let item = use_state(|| None::<InventoryItem>);
    let quantity = use_state(String::new);
    let message = use_state(String::new);

    {
        let (api, notifier, item, quantity) = (api.clone(), notifier.clone(), item.clone(), quantity.clone());
        use_effect_with(props.id, move |id| {
            let id = *id;
            spawn_local(async move {
                match api.get::<InventoryItem>(&format!("/inventory/{id}")).await {
                    Ok(found) => {
                        quantity.set(found.quantity.unwrap_or(0).to_string());
                        item.set(Some(found));
                    }
                    Err(e) => notifier.error(failure_text(&e, "Failed to fetch inventory item for quantity update")),
                }
            });
            || ()
        });
    }

    let back = {
        let navigator = navigator.clone();
        move || {
            if let Some(nav) = &navigator {
                nav.push(&Route::Inventory);
            }
        }
    };

    let onsubmit = {
        let (item, quantity, message) = (item.clone(), quantity.clone(), message.clone());
        let back = back.clone();
        let id = props.id;
        Callback::from(move |ev: SubmitEvent| {
            ev.prevent_default();
            let Some(current) = (*item).clone() else { return };
            let q = match parse_quantity(&quantity) {
                Ok(q) => q,
                Err(e) => {
                    message.set(e.to_string());
                    return;
                }
            };
            let updated = InventoryItem { quantity: Some(q), ..current };
            let (api, notifier, back) = (api.clone(), notifier.clone(), back.clone());
            spawn_local(async move {
                match api.put_unit(&format!("/inventory/{id}"), &updated).await {
                    Ok(()) => {
                        notifier.success("Quantity updated successfully");
                        back();
                    }
                    Err(e) => notifier.error(failure_text(&e, "Failed to update quantity")),
                }
            });
        })
    };

    let Some(current) = (*item).clone() else {
        return html!(<p class="loading">{"Loading item data..."}</p>);
    };

    html! {
        <div class="page narrow">
            <h1>{ format!("Update Quantity - {}", text_or_dash(current.ref_code.as_deref())) }</h1>
            <form {onsubmit}>
                <label>{"Quantity"}
                    <input type="number" min="0" required={true} value={(*quantity).clone()}
                           oninput={let q = quantity.clone(); move |e: InputEvent| q.set(input_value(&e))} />
                </label>
                if !message.is_empty() {
                    <p class="form-error">{ &*message }</p>
                }
                <div class="form-actions">
                    <button type="submit" class="primary">{"Update Quantity"}</button>
                    <button type="button" onclick={move |_| back()}>{"Cancel"}</button>
                </div>
            </form>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: i64, code: &str, site: &str, qty: i64, price: f64) -> InventoryItem {
        InventoryItem {
            id: Some(id),
            ref_code: Some(code.into()),
            site: Some(site.into()),
            quantity: Some(qty),
            price: Some(price),
            ..Default::default()
        }
    }

    fn ids(items: &[InventoryItem]) -> Vec<i64> {
        items.iter().filter_map(|i| i.id).collect()
    }

    #[test]
    fn search_starts_at_two_characters() {
        let items = vec![item(1, "KHM-01", "Tanger", 3, 1.0), item(2, "RG9", "Kenitra", 1, 2.0)];
        assert_eq!(ids(&filter_items(&items, "k")), vec![1, 2]);
        assert_eq!(ids(&filter_items(&items, "kh")), vec![1]);
        assert_eq!(ids(&filter_items(&items, "KENI")), vec![2]);
        assert!(filter_items(&items, "zz").is_empty());
    }

    #[test]
    fn search_covers_type_and_place() {
        let mut a = item(1, "A", "S", 0, 0.0);
        a.place = Some("Rack 4".into());
        let mut b = item(2, "B", "S", 0, 0.0);
        b.kind = Some("Holder".into());
        let items = vec![a, b];
        assert_eq!(ids(&filter_items(&items, "rack")), vec![1]);
        assert_eq!(ids(&filter_items(&items, "hold")), vec![2]);
    }

    #[test]
    fn sort_toggles_direction() {
        let mut items = vec![item(1, "b", "S", 5, 3.0), item(2, "A", "S", 9, 1.0), item(3, "c", "S", 1, 2.0)];
        let sort = Sort::default();
        sort_items(&mut items, sort);
        assert_eq!(ids(&items), vec![2, 1, 3]);

        let sort = sort.toggle(SortKey::Quantity);
        sort_items(&mut items, sort);
        assert_eq!(ids(&items), vec![3, 1, 2]);

        let sort = sort.toggle(SortKey::Quantity);
        assert!(!sort.ascending);
        sort_items(&mut items, sort);
        assert_eq!(ids(&items), vec![2, 1, 3]);

        sort_items(&mut items, Sort { key: SortKey::Price, ascending: true });
        assert_eq!(ids(&items), vec![2, 3, 1]);
    }

    #[test]
    fn draft_keeps_unedited_fields() {
        let mut base = item(7, "OLD", "S", 1, 1.0);
        base.extra.insert("createdBy".into(), "jdoe".into());
        let draft = ItemDraft {
            ref_code: " NEW ".into(),
            quantity: "12".into(),
            price: "2,5".into(),
            ..ItemDraft::from_item(&base)
        };
        let out = draft.apply(base).unwrap();
        assert_eq!(out.id, Some(7));
        assert_eq!(out.ref_code.as_deref(), Some("NEW"));
        assert_eq!(out.quantity, Some(12));
        assert_eq!(out.price, Some(2.5));
        assert_eq!(out.extra["createdBy"], "jdoe");
    }

    #[test]
    fn draft_validation() {
        let draft = ItemDraft { ref_code: "R".into(), site: "S".into(), quantity: "x".into(), ..Default::default() };
        assert_eq!(draft.apply(InventoryItem::default()), Err(ItemError::NotANumber("Quantity")));

        let draft = ItemDraft { site: "S".into(), quantity: "1".into(), ..Default::default() };
        assert_eq!(draft.apply(InventoryItem::default()), Err(ItemError::Required("Ref code")));

        assert_eq!(parse_quantity("-1"), Err(ItemError::Negative("Quantity")));
        assert_eq!(parse_quantity(" 4 "), Ok(4));
    }
}
