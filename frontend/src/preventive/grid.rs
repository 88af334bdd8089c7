//! Weekly preventive schedule: which pack is serviced which week, per site.

use std::collections::{BTreeMap, BTreeSet};

use yew::prelude::*;

use crate::config::WEEKS_PER_YEAR;
use crate::models::{Pack, ScheduleEntry};

/// `site → pack → weeks`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ScheduleGrid(BTreeMap<i64, BTreeMap<i64, BTreeSet<u32>>>);

impl ScheduleGrid {
    pub fn from_entries(entries: &[ScheduleEntry]) -> Self {
        let mut grid = ScheduleGrid::default();
        for e in entries {
            grid.assign(e.site_id, e.pack_id, e.week_number);
        }
        grid
    }

    pub fn is_assigned(&self, site: i64, pack: i64, week: u32) -> bool {
        self.0
            .get(&site)
            .and_then(|packs| packs.get(&pack))
            .is_some_and(|weeks| weeks.contains(&week))
    }

    pub fn assign(&mut self, site: i64, pack: i64, week: u32) {
        self.0.entry(site).or_default().entry(pack).or_default().insert(week);
    }

    /// Removes the week and prunes the pack and site when they end up empty.
    pub fn unassign(&mut self, site: i64, pack: i64, week: u32) {
        let Some(packs) = self.0.get_mut(&site) else { return };
        if let Some(weeks) = packs.get_mut(&pack) {
            weeks.remove(&week);
            if weeks.is_empty() {
                packs.remove(&pack);
            }
        }
        if packs.is_empty() {
            self.0.remove(&site);
        }
    }

    pub fn weeks(&self, site: i64, pack: i64) -> Vec<u32> {
        self.0
            .get(&site)
            .and_then(|packs| packs.get(&pack))
            .map(|w| w.iter().copied().collect())
            .unwrap_or_default()
    }

    pub fn site_count(&self) -> usize {
        self.0.len()
    }
}

pub fn weeks() -> impl Iterator<Item = u32> {
    1..=WEEKS_PER_YEAR
}

/// Body of the unassign call (no year, the backend matches on the triple).
#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Unassign {
    pub site_id: i64,
    pub pack_id: i64,
    pub week_number: u32,
}

/* -------------------------------------------------------------------------- */
/*                                  tableau                                   */
/* -------------------------------------------------------------------------- */

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cell {
    pub pack_id: i64,
    pub week: u32,
    pub assigned: bool,
}

#[derive(Properties, PartialEq)]
pub struct ScheduleTableProps {
    pub site_id: i64,
    pub packs: Vec<Pack>,
    pub grid: ScheduleGrid,
    pub on_cell: Callback<Cell>,
    /// Read-only grids only react to assigned cells.
    #[prop_or_default]
    pub read_only: bool,
}

#[function_component(ScheduleTable)]
pub fn schedule_table(props: &ScheduleTableProps) -> Html {
    if props.packs.is_empty() {
        return html!(<p class="empty">{"No packs for this site."}</p>);
    }
    html! {
        <div class="schedule-scroll">
            <table class="schedule">
                <thead>
                    <tr>
                        <th class="sticky">{"Pack"}</th>
                        { for weeks().map(|w| html!(<th>{ format!("W{w}") }</th>)) }
                    </tr>
                </thead>
                <tbody>
                    { for props.packs.iter().filter_map(|p| p.id.map(|id| (id, p))).map(|(pack_id, pack)| html! {
                        <tr key={pack_id}>
                            <td class="sticky">{ pack.label() }</td>
                            { for weeks().map(|week| {
                                let assigned = props.grid.is_assigned(props.site_id, pack_id, week);
                                let clickable = assigned || !props.read_only;
                                let on_cell = props.on_cell.clone();
                                let onclick = Callback::from(move |_: MouseEvent| {
                                    if clickable {
                                        on_cell.emit(Cell { pack_id, week, assigned });
                                    }
                                });
                                html! {
                                    <td class={classes!("week", assigned.then_some("assigned"), clickable.then_some("clickable"))}
                                        title={format!("Week {week}")} {onclick}>
                                        { if assigned { "●" } else { "" } }
                                    </td>
                                }
                            }) }
                        </tr>
                    }) }
                </tbody>
            </table>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(site: i64, pack: i64, week: u32) -> ScheduleEntry {
        ScheduleEntry { site_id: site, pack_id: pack, week_number: week, year: Some(2025) }
    }

    #[test]
    fn groups_entries_by_site_and_pack() {
        let grid = ScheduleGrid::from_entries(&[entry(1, 10, 5), entry(1, 10, 2), entry(1, 11, 5), entry(2, 10, 5)]);
        assert_eq!(grid.weeks(1, 10), vec![2, 5]);
        assert!(grid.is_assigned(1, 11, 5));
        assert!(!grid.is_assigned(2, 11, 5));
        assert_eq!(grid.site_count(), 2);
    }

    #[test]
    fn unassign_prunes_empty_branches() {
        let mut grid = ScheduleGrid::from_entries(&[entry(1, 10, 5)]);
        grid.unassign(1, 10, 6);
        assert!(grid.is_assigned(1, 10, 5));
        grid.unassign(1, 10, 5);
        assert_eq!(grid, ScheduleGrid::default());
        grid.unassign(9, 9, 9);
        assert_eq!(grid.site_count(), 0);
    }

    #[test]
    fn assign_is_idempotent() {
        let mut grid = ScheduleGrid::default();
        grid.assign(1, 2, 52);
        grid.assign(1, 2, 52);
        assert_eq!(grid.weeks(1, 2), vec![52]);
        assert_eq!(weeks().count(), 52);
    }

    #[test]
    fn unassign_body_has_no_year() {
        let body = serde_json::to_value(Unassign { site_id: 1, pack_id: 2, week_number: 3 }).unwrap();
        assert_eq!(body, serde_json::json!({"siteId": 1, "packId": 2, "weekNumber": 3}));
    }
}
