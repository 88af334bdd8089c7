use std::collections::HashMap;

use log::{debug, error};
use yew::platform::spawn_local;
use yew::prelude::*;

use crate::models::{Intervention, InventoryItem};
use crate::notice::use_notifier;
use crate::session::use_api;
use crate::utils::failure_text;

const TOP: usize = 10;
const OTHERS: &str = "Others";
const UNDEFINED: &str = "Undefined";

/* -------------------------------------------------------------------------- */
/*                                agrégations                                 */
/* -------------------------------------------------------------------------- */

#[derive(Clone, Debug, PartialEq)]
pub struct Bar {
    pub label: String,
    pub value: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SiteShare {
    pub site: String,
    /// `(nature, percentage)` in the order natures were first met.
    pub shares: Vec<(String, f64)>,
}

fn label_or(value: Option<&str>, fallback: &str) -> String {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => fallback.to_string(),
    }
}

fn inventory_name(item: &InventoryItem) -> String {
    label_or(item.ref_code.as_deref(), "No Ref Code")
}

fn intervention_type(i: &Intervention) -> String {
    label_or(i.type_intervention.as_deref(), "No Type")
}

/// Sums per key, keeping first-seen order so ties sort stably.
fn tally<T>(rows: &[T], key: impl Fn(&T) -> String, amount: impl Fn(&T) -> f64) -> Vec<Bar> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut bars: Vec<Bar> = Vec::new();
    for row in rows {
        let label = key(row);
        let slot = *index.entry(label.clone()).or_insert_with(|| {
            bars.push(Bar { label, value: 0.0 });
            bars.len() - 1
        });
        bars[slot].value += amount(row);
    }
    bars
}

fn descending(mut bars: Vec<Bar>) -> Vec<Bar> {
    bars.sort_by(|a, b| b.value.total_cmp(&a.value));
    bars
}

fn top(bars: Vec<Bar>, n: usize) -> Vec<Bar> {
    descending(bars).into_iter().take(n).collect()
}

fn quantity(item: &InventoryItem) -> f64 {
    item.quantity.unwrap_or(0) as f64
}

pub fn top_by_quantity(items: &[InventoryItem], n: usize) -> Vec<Bar> {
    let bars = items
        .iter()
        .map(|i| Bar { label: inventory_name(i), value: quantity(i) })
        .collect();
    top(bars, n)
}

/// Stock value: price × quantity, missing values count as zero.
pub fn top_by_value(items: &[InventoryItem], n: usize) -> Vec<Bar> {
    let bars = items
        .iter()
        .map(|i| Bar {
            label: inventory_name(i),
            value: i.price.unwrap_or(0.0) * quantity(i),
        })
        .collect();
    top(bars, n)
}

pub fn interventions_by_frequency(rows: &[Intervention], n: usize) -> Vec<Bar> {
    top(tally(rows, intervention_type, |_| 1.0), n)
}

pub fn interventions_by_cost(rows: &[Intervention], n: usize) -> Vec<Bar> {
    top(tally(rows, intervention_type, |i| i.valeur_euro.unwrap_or(0.0)), n)
}

/// Quantity per inventory type; past `keep` categories the rest is folded into "Others".
pub fn quantity_by_type(items: &[InventoryItem], keep: usize) -> Vec<Bar> {
    let mut bars = descending(tally(
        items,
        |i| label_or(i.kind.as_deref(), UNDEFINED),
        quantity,
    ));
    if bars.len() > keep {
        let rest: f64 = bars.drain(keep..).map(|b| b.value).sum();
        bars.push(Bar { label: OTHERS.into(), value: rest });
    }
    bars
}

/// Share of each intervention nature within each site, in percent.
pub fn nature_share_by_site(rows: &[Intervention]) -> Vec<SiteShare> {
    let nature = |i: &Intervention| label_or(i.nature_intervention.as_deref(), UNDEFINED);
    let site = |i: &Intervention| label_or(i.site.as_deref(), UNDEFINED);

    let natures: Vec<String> = tally(rows, nature, |_| 0.0).into_iter().map(|b| b.label).collect();

    tally(rows, site, |_| 0.0)
        .into_iter()
        .map(|s| {
            let at_site: Vec<&Intervention> = rows.iter().filter(|i| site(i) == s.label).collect();
            let total = at_site.len() as f64;
            let shares = natures
                .iter()
                .map(|n| {
                    let count = at_site.iter().filter(|i| nature(i) == *n).count() as f64;
                    (n.clone(), if total > 0.0 { count / total * 100.0 } else { 0.0 })
                })
                .collect();
            SiteShare { site: s.label, shares }
        })
        .collect()
}

/* -------------------------------------------------------------------------- */
/*                                 composants                                 */
/* -------------------------------------------------------------------------- */

#[derive(Properties, PartialEq)]
struct BarTableProps {
    title: AttrValue,
    bars: Vec<Bar>,
    #[prop_or_default]
    money: bool,
}

/// A table with one proportional bar per row, scaled on the largest value.
#[function_component(BarTable)]
fn bar_table(props: &BarTableProps) -> Html {
    let max = props.bars.iter().map(|b| b.value).fold(0.0_f64, f64::max);
    html! {
        <div class="chart-card">
            <h3>{ props.title.clone() }</h3>
            if props.bars.is_empty() {
                <p class="empty">{"No data"}</p>
            } else {
                <table class="bar-table">
                    <tbody>
                        { for props.bars.iter().map(|b| {
                            let width = if max > 0.0 { b.value / max * 100.0 } else { 0.0 };
                            let shown = if props.money { format!("{:.2} €", b.value) } else { format!("{}", b.value) };
                            html! {
                                <tr>
                                    <td class="bar-label">{ &b.label }</td>
                                    <td class="bar-cell">
                                        <div class="bar" style={format!("width:{width:.1}%")}></div>
                                    </td>
                                    <td class="bar-value">{ shown }</td>
                                </tr>
                            }
                        }) }
                    </tbody>
                </table>
            }
        </div>
    }
}

#[function_component(Dashboard)]
pub fn dashboard() -> Html {
    let api = use_api();
    let notifier = use_notifier();
    let inventory = use_state(Vec::<InventoryItem>::new);
    let interventions = use_state(Vec::<Intervention>::new);
    let loading = use_state(|| true);

    /* ---------------- chargement initial ---------------- */
    {
        let inventory = inventory.clone();
        let interventions = interventions.clone();
        let loading = loading.clone();
        use_effect_with((), move |_| {
            spawn_local(async move {
                let (inv, maint) = futures::join!(
                    api.get::<Vec<InventoryItem>>("/inventory"),
                    api.get::<Vec<Intervention>>("/maintenance"),
                );
                match (inv, maint) {
                    (Ok(inv), Ok(maint)) => {
                        debug!("dashboard: {} items, {} interventions", inv.len(), maint.len());
                        inventory.set(inv);
                        interventions.set(maint);
                    }
                    (Err(e), _) | (_, Err(e)) => {
                        error!("dashboard: {e}");
                        notifier.error(failure_text(&e, "Failed to fetch dashboard data."));
                    }
                }
                loading.set(false);
            });
            || ()
        });
    }

    if *loading {
        return html!(<p class="loading">{"Loading…"}</p>);
    }

    let by_site = nature_share_by_site(&interventions);

    html! {
        <div class="dashboard">
            <h1>{"Dashboard"}</h1>
            <div class="chart-grid">
                <BarTable title="Top 10 items by quantity" bars={top_by_quantity(&inventory, TOP)} />
                <BarTable title="Top 10 items by value" bars={top_by_value(&inventory, TOP)} money={true} />
                <BarTable title="Top 10 interventions by frequency" bars={interventions_by_frequency(&interventions, TOP)} />
                <BarTable title="Top 10 interventions by cost" bars={interventions_by_cost(&interventions, TOP)} money={true} />
                <BarTable title="Inventory quantity by type" bars={quantity_by_type(&inventory, TOP)} />
            </div>

            <div class="chart-card">
                <h3>{"Intervention nature by site (%)"}</h3>
                if by_site.is_empty() {
                    <p class="empty">{"No data"}</p>
                } else {
                    <table class="data-table">
                        <thead>
                            <tr>
                                <th>{"Site"}</th>
                                { for by_site[0].shares.iter().map(|(n, _)| html!(<th>{ n }</th>)) }
                            </tr>
                        </thead>
                        <tbody>
                            { for by_site.iter().map(|s| html! {
                                <tr>
                                    <td>{ &s.site }</td>
                                    { for s.shares.iter().map(|(_, pct)| html!(<td>{ format!("{pct:.2}%") }</td>)) }
                                </tr>
                            }) }
                        </tbody>
                    </table>
                }
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(code: Option<&str>, kind: Option<&str>, qty: i64, price: Option<f64>) -> InventoryItem {
        InventoryItem {
            ref_code: code.map(Into::into),
            kind: kind.map(Into::into),
            quantity: Some(qty),
            price,
            ..Default::default()
        }
    }

    fn intervention(kind: Option<&str>, cost: f64, nature: Option<&str>, site: &str) -> Intervention {
        Intervention {
            type_intervention: kind.map(Into::into),
            valeur_euro: Some(cost),
            nature_intervention: nature.map(Into::into),
            site: Some(site.into()),
            ..Default::default()
        }
    }

    #[test]
    fn quantity_and_value_rankings() {
        let items = vec![
            item(Some("A"), None, 5, Some(10.0)),
            item(Some(" "), None, 50, Some(0.5)),
            item(Some("C"), None, 20, None),
        ];
        let by_qty = top_by_quantity(&items, 2);
        assert_eq!(by_qty[0], Bar { label: "No Ref Code".into(), value: 50.0 });
        assert_eq!(by_qty[1].label, "C");
        assert_eq!(by_qty.len(), 2);

        let by_value = top_by_value(&items, 10);
        assert_eq!(by_value[0], Bar { label: "A".into(), value: 50.0 });
        assert_eq!(by_value[2].value, 0.0);
    }

    #[test]
    fn interventions_grouped_by_type() {
        let rows = vec![
            intervention(Some("KHM (RG9)"), 0.04, None, "S1"),
            intervention(None, 3.0, None, "S1"),
            intervention(Some("KHM (RG9)"), 0.04, None, "S2"),
        ];
        let freq = interventions_by_frequency(&rows, 10);
        assert_eq!(freq[0], Bar { label: "KHM (RG9)".into(), value: 2.0 });
        assert_eq!(freq[1].label, "No Type");

        let cost = interventions_by_cost(&rows, 10);
        assert_eq!(cost[0], Bar { label: "No Type".into(), value: 3.0 });
    }

    #[test]
    fn extra_types_fold_into_others() {
        let items: Vec<InventoryItem> = (0..12)
            .map(|i| item(Some("x"), Some(format!("T{i}").as_str()), 12 - i, None))
            .collect();
        let bars = quantity_by_type(&items, 10);
        assert_eq!(bars.len(), 11);
        assert_eq!(bars[0], Bar { label: "T0".into(), value: 12.0 });
        assert_eq!(bars[10], Bar { label: "Others".into(), value: 2.0 + 1.0 });
    }

    #[test]
    fn nature_percentages_per_site() {
        let rows = vec![
            intervention(None, 0.0, Some("Reglage"), "S1"),
            intervention(None, 0.0, Some("Revision"), "S1"),
            intervention(None, 0.0, Some("Revision"), "S1"),
            intervention(None, 0.0, None, "S2"),
        ];
        let shares = nature_share_by_site(&rows);
        assert_eq!(shares.len(), 2);
        assert_eq!(shares[0].site, "S1");
        let s1: Vec<(String, f64)> = shares[0].shares.clone();
        assert_eq!(s1[0].0, "Reglage");
        assert!((s1[0].1 - 100.0 / 3.0).abs() < 1e-9);
        assert!((s1[1].1 - 200.0 / 3.0).abs() < 1e-9);
        assert_eq!(s1[2], ("Undefined".to_string(), 0.0));
        assert_eq!(shares[1].shares[2], ("Undefined".to_string(), 100.0));
    }
}
