//! Corrective maintenance interventions.

use log::{error, info};
use thiserror::Error;
use yew::platform::spawn_local;
use yew::prelude::*;
use yew_router::prelude::*;

use crate::auth::username_from_token;
use crate::config::SEARCH_MIN_LEN;
use crate::models::{Intervention, Site};
use crate::notice::use_notifier;
use crate::session::{use_api, use_session};
use crate::utils::{confirm, contains_ci, failure_text, format_money, input_value, search_needle, text_or_dash};
use crate::Route;

/// Intervention types with their unit cost in euros. `Autre` is free text, costed 0.
pub const INTERVENTION_TYPES: [(&str, f64); 28] = [
    ("KHM (Photo cellule/Sensor EH01-V4_60)", 7.74),
    ("KHM (Charboune/Power Supply Sliders KHM-SLI03)", 12.46),
    ("KHM (Carte Muster/DC-08A02)", 58.71),
    ("KHM (Carte Slave/DC-05P05)", 46.25),
    ("KHM (Carte de communication/DC-08C02)", 22.53),
    ("KHM (Transformateur/Power Supply 230VAC/12VDC/5A)", 3.2),
    ("KHM (Raille/Power Supply Sliders KHM-SLI03)", 18.49),
    ("KHM (RG9)", 0.04),
    ("Element Metalique (support/clip Jig FD KHM)", 5.0),
    ("Element Metalique (Tige/Jig FD 110/80/06 )", 4.34),
    ("Element Metalique (Jig B/support CP M  )", 4.34),
    ("Element Metalique (Jig steel /support CP F  )", 2.53),
    ("Element Metalique (Ressort /Jig  Flex 130 )", 1.46),
    ("Element Metalique ( Masse/Jig ground 5 mm )", 2.0),
    ("Element Metalique ( Special Jig )", 5.36),
    ("Element Metalique (Passe fils/Expender)", 18.0),
    ("Holder (Point soudage/Jig Splice holder)", 3.5),
    ("Holder (Contre piéce)", 10.5),
    ("Holder (Pince crocodille ( Jig FIX W_Holder_50mm)", 3.5),
    ("Accesoire Holder (stopper 35mm)", 3.03),
    ("Accesoire Holder (stopper 40mm)", 3.03),
    ("Accesoire Holder(stopper 45mm)", 3.06),
    ("Accesoire Holder (stopper 55mm)", 4.0),
    ("Accesoire Holder (stopper 65mm)", 4.0),
    ("Accesoire Holder(stopper 70mm)", 4.0),
    ("Accesoire Holder (Guidage/Hosing core guidance PA)", 7.0),
    ("Accesoire Holder (Switch/D2F221 (SW4EH01)", 1.05),
    ("Autre", 0.0),
];

pub const NATURES: [&str; 5] = ["Predictive", "Reglage", "Remplacement", "Reparation", "Revision"];
pub const SHIFTS: [&str; 3] = ["A", "B", "C"];

/// Catalogue cost of an intervention type, 0 for anything outside it.
pub fn unit_cost(kind: &str) -> f64 {
    INTERVENTION_TYPES
        .iter()
        .find(|(label, _)| *label == kind)
        .map_or(0.0, |(_, euro)| *euro)
}

/* -------------------------------------------------------------------------- */
/*                                   filtres                                  */
/* -------------------------------------------------------------------------- */

#[derive(Clone, Debug, Default, PartialEq)]
pub struct MaintenanceFilter {
    pub text: String,
    pub site: String,
    /// Inclusive ISO dates (`YYYY-MM-DD`), empty for open bounds.
    pub from: String,
    pub to: String,
}

fn day(date: &str) -> &str {
    date.get(..10).unwrap_or(date)
}

impl MaintenanceFilter {
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty() && self.site.is_empty() && self.from.is_empty() && self.to.is_empty()
    }

    pub fn matches(&self, i: &Intervention) -> bool {
        let text_ok = match search_needle(&self.text, SEARCH_MIN_LEN) {
            None => true,
            Some(needle) => [
                &i.type_intervention,
                &i.point_examiner,
                &i.nature_intervention,
                &i.poste_touche,
                &i.zone,
                &i.nom_prenom_bb,
                &i.site,
                &i.shift,
            ]
            .into_iter()
            .any(|f| contains_ci(f.as_deref(), &needle)),
        };
        let site_ok = self.site.is_empty() || i.site.as_deref() == Some(self.site.as_str());
        let date = i.date.as_deref().map(day);
        let from_ok = self.from.is_empty() || date.is_some_and(|d| d >= self.from.as_str());
        let to_ok = self.to.is_empty() || date.is_some_and(|d| d <= self.to.as_str());
        text_ok && site_ok && from_ok && to_ok
    }

    pub fn apply(&self, rows: &[Intervention]) -> Vec<Intervention> {
        rows.iter().filter(|i| self.matches(i)).cloned().collect()
    }
}

/* -------------------------------------------------------------------------- */
/*                                 brouillon                                  */
/* -------------------------------------------------------------------------- */

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InterventionError {
    #[error("{0} is required")]
    Required(&'static str),
    #[error("{0} must be a number")]
    NotANumber(&'static str),
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct InterventionDraft {
    pub type_intervention: String,
    pub valeur_euro: f64,
    pub point_examiner: String,
    pub nature_intervention: String,
    pub poste_touche: String,
    pub zone: String,
    pub shift: String,
    pub numero_panneau: String,
    pub nom_prenom_bb: String,
    pub temps_intervention: String,
    pub date: String,
    pub commentaire: String,
    pub site: String,
}

#[derive(Clone, Copy)]
enum Field {
    Point,
    Nature,
    Poste,
    Zone,
    Shift,
    Panel,
    Technician,
    Duration,
    Date,
    Comment,
    Site,
}

fn text(v: &Option<String>) -> String {
    v.clone().unwrap_or_default()
}

fn optional(raw: &str) -> Option<String> {
    let raw = raw.trim();
    (!raw.is_empty()).then(|| raw.to_string())
}

impl InterventionDraft {
    pub fn new(technician: Option<String>) -> Self {
        Self {
            nom_prenom_bb: technician.unwrap_or_default(),
            ..Default::default()
        }
    }

    /// Loaded record; a catalogue type takes its catalogue cost, an unknown one keeps the stored value.
    pub fn from_intervention(i: &Intervention, technician: Option<String>) -> Self {
        let kind = text(&i.type_intervention);
        let known = INTERVENTION_TYPES.iter().any(|(label, _)| *label == kind);
        let nom = optional(&text(&i.nom_prenom_bb)).or(technician).unwrap_or_default();
        Self {
            valeur_euro: if known { unit_cost(&kind) } else { i.valeur_euro.unwrap_or(0.0) },
            type_intervention: kind,
            point_examiner: text(&i.point_examiner),
            nature_intervention: text(&i.nature_intervention),
            poste_touche: text(&i.poste_touche),
            zone: text(&i.zone),
            shift: text(&i.shift),
            numero_panneau: text(&i.numero_panneau),
            nom_prenom_bb: nom,
            temps_intervention: i.temps_intervention.map(|t| t.to_string()).unwrap_or_default(),
            date: i.date.as_deref().map(day).unwrap_or_default().to_string(),
            commentaire: text(&i.commentaire),
            site: text(&i.site),
        }
    }

    /// Picking a type also prices it.
    pub fn select_type(&mut self, kind: String) {
        self.valeur_euro = unit_cost(&kind);
        self.type_intervention = kind;
    }

    fn set(&mut self, field: Field, value: String) {
        let slot = match field {
            Field::Point => &mut self.point_examiner,
            Field::Nature => &mut self.nature_intervention,
            Field::Poste => &mut self.poste_touche,
            Field::Zone => &mut self.zone,
            Field::Shift => &mut self.shift,
            Field::Panel => &mut self.numero_panneau,
            Field::Technician => &mut self.nom_prenom_bb,
            Field::Duration => &mut self.temps_intervention,
            Field::Date => &mut self.date,
            Field::Comment => &mut self.commentaire,
            Field::Site => &mut self.site,
        };
        *slot = value;
    }

    pub fn apply(&self, base: Intervention) -> Result<Intervention, InterventionError> {
        let type_intervention = optional(&self.type_intervention).ok_or(InterventionError::Required("Intervention type"))?;
        let site = optional(&self.site).ok_or(InterventionError::Required("Site"))?;
        let temps_intervention = match optional(&self.temps_intervention) {
            None => None,
            Some(raw) => Some(
                raw.replace(',', ".")
                    .parse::<f64>()
                    .map_err(|_| InterventionError::NotANumber("Intervention time"))?,
            ),
        };
        Ok(Intervention {
            type_intervention: Some(type_intervention),
            valeur_euro: Some(self.valeur_euro),
            point_examiner: optional(&self.point_examiner),
            nature_intervention: optional(&self.nature_intervention),
            poste_touche: optional(&self.poste_touche),
            zone: optional(&self.zone),
            shift: optional(&self.shift),
            numero_panneau: optional(&self.numero_panneau),
            nom_prenom_bb: optional(&self.nom_prenom_bb),
            temps_intervention,
            date: optional(&self.date),
            commentaire: optional(&self.commentaire),
            site: Some(site),
            ..base
        })
    }
}

/* -------------------------------------------------------------------------- */
/*                                    liste                                   */
/* -------------------------------------------------------------------------- */

#[function_component(MaintenanceList)]
pub fn maintenance_list() -> Html {
    let api = use_api();
    let notifier = use_notifier();
    let navigator = use_navigator();

    let rows = use_state(Vec::<Intervention>::new);
    let sites = use_state(Vec::<Site>::new);
    let loading = use_state(|| true);
    let filter = use_state(MaintenanceFilter::default);

    {
        let (api, notifier) = (api.clone(), notifier.clone());
        let (rows, sites, loading) = (rows.clone(), sites.clone(), loading.clone());
        use_effect_with((), move |_| {
            spawn_local(async move {
                let (list, site_list) = futures::join!(
                    api.get::<Vec<Intervention>>("/maintenance"),
                    api.get::<Vec<Site>>("/sites"),
                );
                match list {
                    Ok(list) => rows.set(list),
                    Err(e) => {
                        error!("maintenance: {e}");
                        notifier.error(failure_text(&e, "Failed to fetch maintenance records"));
                    }
                }
                match site_list {
                    Ok(list) => sites.set(list),
                    Err(e) => notifier.error(failure_text(&e, "Failed to fetch sites")),
                }
                loading.set(false);
            });
            || ()
        });
    }

    let on_delete = {
        let rows = rows.clone();
        Callback::from(move |id: i64| {
            if !confirm("Are you sure you want to delete this intervention?") {
                return;
            }
            let (api, notifier, rows) = (api.clone(), notifier.clone(), rows.clone());
            spawn_local(async move {
                match api.delete(&format!("/maintenance/{id}")).await {
                    Ok(()) => {
                        info!("intervention {id} deleted");
                        rows.set(rows.iter().filter(|r| r.id != Some(id)).cloned().collect());
                        notifier.success("Intervention deleted.");
                    }
                    Err(e) => notifier.error(failure_text(&e, "Failed to delete the intervention")),
                }
            });
        })
    };

    let edit_filter = |apply: fn(&mut MaintenanceFilter, String)| {
        let filter = filter.clone();
        Callback::from(move |e: Event| {
            let mut next = (*filter).clone();
            apply(&mut next, input_value(&e));
            filter.set(next);
        })
    };

    let go = |route: Route| {
        let navigator = navigator.clone();
        Callback::from(move |_: MouseEvent| {
            if let Some(nav) = &navigator {
                nav.push(&route);
            }
        })
    };

    let reset = {
        let filter = filter.clone();
        Callback::from(move |_: MouseEvent| filter.set(MaintenanceFilter::default()))
    };

    let shown = filter.apply(&rows);

    html! {
        <div class="page">
            <h1>{"Maintenance Interventions"}</h1>
            <div class="toolbar">
                <input type="search" class="search" placeholder="Search interventions..."
                       value={filter.text.clone()} onchange={edit_filter(|f, v| f.text = v)} />
                <select onchange={edit_filter(|f, v| f.site = v)}>
                    <option value="" selected={filter.site.is_empty()}>{"All sites"}</option>
                    { for sites.iter().map(|s| html! {
                        <option value={s.label().to_string()} selected={filter.site == s.label()}>{ s.label() }</option>
                    }) }
                </select>
                <label>{"From"}<input type="date" value={filter.from.clone()} onchange={edit_filter(|f, v| f.from = v)} /></label>
                <label>{"To"}<input type="date" value={filter.to.clone()} onchange={edit_filter(|f, v| f.to = v)} /></label>
                <button onclick={reset} disabled={filter.is_empty()}>{"Reset"}</button>
                <button class="primary" onclick={go(Route::MaintenanceAdd)}>{"New Intervention"}</button>
            </div>

            if *loading {
                <p class="loading">{"Loading…"}</p>
            } else if shown.is_empty() {
                <p class="empty">{"No interventions found."}</p>
            } else {
                <table class="data-table">
                    <thead>
                        <tr>
                            { for ["ID", "Type", "Value", "Point", "Nature", "Station", "Zone", "Shift", "Panel",
                                   "Technician", "Time (h)", "Date", "Comment", "Site", "Actions"]
                                .iter().map(|h| html!(<th>{ *h }</th>)) }
                        </tr>
                    </thead>
                    <tbody>
                        { for shown.iter().map(|r| {
                            let id = r.id.unwrap_or_default();
                            let on_delete = on_delete.clone();
                            html! {
                                <tr key={id}>
                                    <td>{ id }</td>
                                    <td>{ text_or_dash(r.type_intervention.as_deref()) }</td>
                                    <td>{ format_money(r.valeur_euro.unwrap_or(0.0)) }</td>
                                    <td>{ text_or_dash(r.point_examiner.as_deref()) }</td>
                                    <td>{ text_or_dash(r.nature_intervention.as_deref()) }</td>
                                    <td>{ text_or_dash(r.poste_touche.as_deref()) }</td>
                                    <td>{ text_or_dash(r.zone.as_deref()) }</td>
                                    <td>{ text_or_dash(r.shift.as_deref()) }</td>
                                    <td>{ text_or_dash(r.numero_panneau.as_deref()) }</td>
                                    <td>{ text_or_dash(r.nom_prenom_bb.as_deref()) }</td>
                                    <td>{ r.temps_intervention.map(|t| t.to_string()).unwrap_or_else(|| "-".into()) }</td>
                                    <td>{ text_or_dash(r.date.as_deref()) }</td>
                                    <td>{ text_or_dash(r.commentaire.as_deref()) }</td>
                                    <td>{ text_or_dash(r.site.as_deref()) }</td>
                                    <td class="actions">
                                        <button onclick={go(Route::MaintenanceEdit { id })}>{"Edit"}</button>
                                        <button class="danger" onclick={move |_| on_delete.emit(id)}>{"Delete"}</button>
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
/*                                 formulaire                                 */
/* -------------------------------------------------------------------------- */

#[derive(Properties, PartialEq)]
pub struct MaintenanceFormProps {
    #[prop_or_default]
    pub id: Option<i64>,
}

#[function_component(MaintenanceForm)]
pub fn maintenance_form(props: &MaintenanceFormProps) -> Html {
    let api = use_api();
    let session = use_session();
    let notifier = use_notifier();
    let navigator = use_navigator();

    let technician = session.session().token.as_deref().and_then(username_from_token);
    let base = use_state(Intervention::default);
    let draft = {
        let technician = technician.clone();
        use_state(move || InterventionDraft::new(technician))
    };
    let sites = use_state(Vec::<Site>::new);
    let loading = use_state(|| true);
    let saving = use_state(|| false);
    let message = use_state(String::new);

    {
        let (api, notifier) = (api.clone(), notifier.clone());
        let (base, draft, sites, loading) = (base.clone(), draft.clone(), sites.clone(), loading.clone());
        use_effect_with(props.id, move |id| {
            let id = *id;
            spawn_local(async move {
                match api.get::<Vec<Site>>("/sites").await {
                    Ok(list) => sites.set(list),
                    Err(e) => notifier.error(failure_text(&e, "Failed to fetch necessary data.")),
                }
                if let Some(id) = id {
                    match api.get::<Intervention>(&format!("/maintenance/{id}")).await {
                        Ok(found) => {
                            draft.set(InterventionDraft::from_intervention(&found, technician));
                            base.set(found);
                        }
                        Err(e) => notifier.error(failure_text(&e, "Failed to fetch necessary data.")),
                    }
                }
                loading.set(false);
            });
            || ()
        });
    }

    let field = |f: Field| {
        let draft = draft.clone();
        Callback::from(move |e: Event| {
            let mut next = (*draft).clone();
            next.set(f, input_value(&e));
            draft.set(next);
        })
    };

    let on_type = {
        let draft = draft.clone();
        Callback::from(move |e: Event| {
            let mut next = (*draft).clone();
            next.select_type(input_value(&e));
            draft.set(next);
        })
    };

    let back = {
        let navigator = navigator.clone();
        move || {
            if let Some(nav) = &navigator {
                nav.push(&Route::Maintenance);
            }
        }
    };

    let onsubmit = {
        let (draft, base, saving, message) = (draft.clone(), base.clone(), saving.clone(), message.clone());
        let back = back.clone();
        let id = props.id;
        Callback::from(move |ev: SubmitEvent| {
            ev.prevent_default();
            let payload = match draft.apply((*base).clone()) {
                Ok(p) => p,
                Err(e) => {
                    message.set(e.to_string());
                    return;
                }
            };
            message.set(String::new());
            let (api, notifier, saving, back) = (api.clone(), notifier.clone(), saving.clone(), back.clone());
            saving.set(true);
            spawn_local(async move {
                let result = match id {
                    Some(id) => api.put_unit(&format!("/maintenance/{id}"), &payload).await,
                    None => api.post_unit("/maintenance", &payload).await,
                };
                saving.set(false);
                match result {
                    Ok(()) => {
                        notifier.success(if id.is_some() {
                            "Intervention updated successfully."
                        } else {
                            "Intervention created successfully."
                        });
                        back();
                    }
                    Err(e) => notifier.error(failure_text(&e, "Failed to save the maintenance intervention.")),
                }
            });
        })
    };

    if *loading {
        return html!(<p class="loading">{"Loading…"}</p>);
    }

    let choice = |current: &str, options: &[&'static str], f: Field| {
        html! {
            <select onchange={field(f)}>
                <option value="" selected={current.is_empty()}>{"-- select --"}</option>
                { for options.iter().map(|o| html!(<option value={*o} selected={current == *o}>{ *o }</option>)) }
            </select>
        }
    };

    html! {
        <div class="page">
            <h1>{ if props.id.is_some() { "Edit Intervention" } else { "New Intervention" } }</h1>
            <form class="form-grid" {onsubmit}>
                <label>{"Site"}
                    <select required={true} onchange={field(Field::Site)}>
                        <option value="" selected={draft.site.is_empty()}>{"-- select --"}</option>
                        { for sites.iter().map(|s| html! {
                            <option value={s.label().to_string()} selected={draft.site == s.label()}>{ s.label() }</option>
                        }) }
                    </select>
                </label>
                <label>{"Shift"}{ choice(&draft.shift, &SHIFTS, Field::Shift) }</label>
                <label>{"Intervention type"}
                    <select required={true} onchange={on_type}>
                        <option value="" selected={draft.type_intervention.is_empty()}>{"-- select --"}</option>
                        { for INTERVENTION_TYPES.iter().map(|(label, _)| html! {
                            <option value={*label} selected={draft.type_intervention == *label}>{ *label }</option>
                        }) }
                    </select>
                </label>
                <label>{"Value (€)"}
                    <input readonly={true} value={format!("{:.2}", draft.valeur_euro)} />
                </label>
                <label>{"Nature"}{ choice(&draft.nature_intervention, &NATURES, Field::Nature) }</label>
                <label>{"Point examined"}
                    <input value={draft.point_examiner.clone()} onchange={field(Field::Point)} />
                </label>
                <label>{"Station"}
                    <input value={draft.poste_touche.clone()} onchange={field(Field::Poste)} />
                </label>
                <label>{"Zone"}
                    <input value={draft.zone.clone()} onchange={field(Field::Zone)} />
                </label>
                <label>{"Panel number"}
                    <input value={draft.numero_panneau.clone()} onchange={field(Field::Panel)} />
                </label>
                <label>{"Technician"}
                    <input value={draft.nom_prenom_bb.clone()} onchange={field(Field::Technician)} />
                </label>
                <label>{"Intervention time (hours)"}
                    <input type="number" step="0.25" min="0" value={draft.temps_intervention.clone()} onchange={field(Field::Duration)} />
                </label>
                <label>{"Date"}
                    <input type="date" value={draft.date.clone()} onchange={field(Field::Date)} />
                </label>
                <label class="wide">{"Comment"}
                    <textarea value={draft.commentaire.clone()} onchange={field(Field::Comment)} />
                </label>
                if !message.is_empty() {
                    <p class="form-error">{ &*message }</p>
                }
                <div class="form-actions">
                    <button type="submit" class="primary" disabled={*saving}>
                        { if *saving { "Saving…" } else { "Save" } }
                    </button>
                    <button type="button" onclick={move |_| back()}>{"Cancel"}</button>
                </div>
            </form>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: i64, kind: &str, site: &str, date: &str) -> Intervention {
        Intervention {
            id: Some(id),
            type_intervention: Some(kind.into()),
            site: Some(site.into()),
            date: Some(date.into()),
            ..Default::default()
        }
    }

    fn ids(rows: &[Intervention]) -> Vec<i64> {
        rows.iter().filter_map(|r| r.id).collect()
    }

    #[test]
    fn catalogue_prices_types() {
        assert_eq!(unit_cost("KHM (Carte Muster/DC-08A02)"), 58.71);
        assert_eq!(unit_cost("Autre"), 0.0);
        assert_eq!(unit_cost("something else"), 0.0);

        let mut draft = InterventionDraft::new(Some("jdoe".into()));
        draft.select_type("KHM (RG9)".into());
        assert_eq!(draft.valeur_euro, 0.04);
        draft.select_type("Autre".into());
        assert_eq!(draft.valeur_euro, 0.0);
        assert_eq!(draft.nom_prenom_bb, "jdoe");
    }

    #[test]
    fn filters_combine() {
        let rows = vec![
            row(1, "KHM (RG9)", "Tanger", "2024-03-01"),
            row(2, "Holder (Contre piéce)", "Kenitra", "2024-03-15T08:00:00"),
            row(3, "KHM (RG9)", "Kenitra", "2024-04-02"),
        ];
        let f = MaintenanceFilter { text: "rg9".into(), ..Default::default() };
        assert_eq!(ids(&f.apply(&rows)), vec![1, 3]);

        let f = MaintenanceFilter { site: "Kenitra".into(), ..Default::default() };
        assert_eq!(ids(&f.apply(&rows)), vec![2, 3]);

        let f = MaintenanceFilter {
            from: "2024-03-10".into(),
            to: "2024-03-31".into(),
            ..Default::default()
        };
        assert_eq!(ids(&f.apply(&rows)), vec![2]);

        let f = MaintenanceFilter { text: "r".into(), site: "Tanger".into(), ..Default::default() };
        assert_eq!(ids(&f.apply(&rows)), vec![1]);
        assert!(MaintenanceFilter::default().is_empty());
    }

    #[test]
    fn undated_rows_fall_outside_date_ranges() {
        let mut r = row(9, "Autre", "S", "");
        r.date = None;
        let f = MaintenanceFilter { from: "2024-01-01".into(), ..Default::default() };
        assert!(!f.matches(&r));
        assert!(MaintenanceFilter::default().matches(&r));
    }

    #[test]
    fn loaded_record_keeps_custom_cost_and_technician() {
        let mut stored = row(4, "Custom fix", "S", "2024-05-06T10:00:00");
        stored.valeur_euro = Some(12.0);
        stored.nom_prenom_bb = Some("A. Tech".into());
        let draft = InterventionDraft::from_intervention(&stored, Some("jdoe".into()));
        assert_eq!(draft.valeur_euro, 12.0);
        assert_eq!(draft.nom_prenom_bb, "A. Tech");
        assert_eq!(draft.date, "2024-05-06");

        stored.type_intervention = Some("KHM (RG9)".into());
        stored.nom_prenom_bb = None;
        let draft = InterventionDraft::from_intervention(&stored, Some("jdoe".into()));
        assert_eq!(draft.valeur_euro, 0.04);
        assert_eq!(draft.nom_prenom_bb, "jdoe");
    }

    #[test]
    fn apply_requires_type_and_site() {
        let draft = InterventionDraft::new(None);
        assert_eq!(
            draft.apply(Intervention::default()),
            Err(InterventionError::Required("Intervention type"))
        );
        let mut draft = InterventionDraft { site: "S".into(), temps_intervention: "1,5".into(), ..Default::default() };
        draft.select_type("KHM (RG9)".into());
        let out = draft.apply(Intervention { id: Some(3), ..Default::default() }).unwrap();
        assert_eq!(out.id, Some(3));
        assert_eq!(out.temps_intervention, Some(1.5));
        assert_eq!(out.valeur_euro, Some(0.04));
    }
}
