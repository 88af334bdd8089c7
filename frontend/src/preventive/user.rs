//! Technician view of the preventive schedule.

use log::{debug, error};
use yew::platform::spawn_local;
use yew::prelude::*;

use super::checklist::ChecklistPanel;
use super::grid::{Cell, ScheduleGrid, ScheduleTable};
use crate::models::{Board, Pack, ScheduleEntry, Site};
use crate::notice::use_notifier;
use crate::session::{use_api, use_session};
use crate::utils::{failure_text, input_value, text_or_dash};

/// Boards serviced as part of `pack_id`.
pub fn boards_of_pack(boards: &[Board], pack_id: i64) -> Vec<Board> {
    boards.iter().filter(|b| b.pack_id == Some(pack_id)).cloned().collect()
}

#[derive(Clone, PartialEq)]
struct PackWeek {
    pack: String,
    week: u32,
    boards: Vec<Board>,
}

#[derive(Properties, PartialEq)]
struct BoardRowsProps {
    boards: Vec<Board>,
    on_pick: Callback<Board>,
}

#[function_component(BoardRows)]
fn board_rows(props: &BoardRowsProps) -> Html {
    if props.boards.is_empty() {
        return html!(<p class="empty">{"No boards."}</p>);
    }
    html! {
        <table class="data-table">
            <thead>
                <tr><th>{"FB Name"}</th><th>{"FB ID"}</th><th>{"Projet"}</th><th>{"Plant"}</th><th>{"Checklists"}</th></tr>
            </thead>
            <tbody>
                { for props.boards.iter().map(|b| {
                    let (on_pick, board) = (props.on_pick.clone(), b.clone());
                    html! {
                        <tr key={b.id.unwrap_or_default()}>
                            <td>{ text_or_dash(b.fb_name.as_deref()) }</td>
                            <td>{ text_or_dash(b.fb_id.as_deref()) }</td>
                            <td>{ text_or_dash(b.projet.as_deref()) }</td>
                            <td>{ text_or_dash(b.plant.as_deref()) }</td>
                            <td class="actions">
                                <button onclick={move |_| on_pick.emit(board.clone())}>{"Open"}</button>
                            </td>
                        </tr>
                    }
                }) }
            </tbody>
        </table>
    }
}

#[function_component(PreventiveUser)]
pub fn preventive_user() -> Html {
    let api = use_api();
    let notifier = use_notifier();
    let user_id = use_session().session().user_id;

    let sites = use_state(Vec::<Site>::new);
    let site_id = use_state(|| None::<i64>);
    let packs = use_state(Vec::<Pack>::new);
    let boards = use_state(Vec::<Board>::new);
    let grid = use_state(ScheduleGrid::default);
    let mine = use_state(Vec::<Board>::new);
    let selected = use_state(|| None::<PackWeek>);
    let checklist_board = use_state(|| None::<Board>);

    /* ---------------- données principales ---------------- */
    {
        let (api, notifier) = (api.clone(), notifier.clone());
        let (sites, boards, grid) = (sites.clone(), boards.clone(), grid.clone());
        use_effect_with((), move |_| {
            spawn_local(async move {
                let (s, b, entries) = futures::join!(
                    api.get::<Vec<Site>>("/sites"),
                    api.get::<Vec<Board>>("/boards"),
                    api.get::<Vec<ScheduleEntry>>("/maintenance-schedules"),
                );
                match (s, b, entries) {
                    (Ok(s), Ok(b), Ok(entries)) => {
                        sites.set(s);
                        boards.set(b);
                        grid.set(ScheduleGrid::from_entries(&entries));
                    }
                    (Err(e), _, _) | (_, Err(e), _) | (_, _, Err(e)) => {
                        error!("preventive data: {e}");
                        notifier.error(failure_text(&e, "Failed to fetch data."));
                    }
                }
            });
            || ()
        });
    }

    /* ---------------- mes cartes ---------------- */
    {
        let (api, notifier, mine) = (api.clone(), notifier.clone(), mine.clone());
        use_effect_with(user_id, move |user_id| {
            match *user_id {
                None => debug!("no user id in session, skipping own boards"),
                Some(id) => spawn_local(async move {
                    match api.get::<Vec<Board>>(&format!("/boards/user/{id}")).await {
                        Ok(list) => mine.set(list),
                        Err(e) => notifier.error(failure_text(&e, "Failed to fetch your boards.")),
                    }
                }),
            }
            || ()
        });
    }

    /* ---------------- packs du site ---------------- */
    {
        let (packs, selected) = (packs.clone(), selected.clone());
        use_effect_with(*site_id, move |site_id| {
            selected.set(None);
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
        let (packs, boards, selected) = (packs.clone(), boards.clone(), selected.clone());
        Callback::from(move |cell: Cell| {
            if !cell.assigned {
                return;
            }
            let pack = packs
                .iter()
                .find(|p| p.id == Some(cell.pack_id))
                .map(|p| p.label().to_string())
                .unwrap_or_else(|| format!("Pack #{}", cell.pack_id));
            selected.set(Some(PackWeek {
                pack,
                week: cell.week,
                boards: boards_of_pack(&boards, cell.pack_id),
            }));
        })
    };

    let on_pick = {
        let checklist_board = checklist_board.clone();
        Callback::from(move |b: Board| checklist_board.set(Some(b)))
    };

    let on_close_checklists = {
        let checklist_board = checklist_board.clone();
        Callback::from(move |_: ()| checklist_board.set(None))
    };

    html! {
        <div class="page">
            <h1>{"Preventive Maintenance Schedule"}</h1>

            <div class="toolbar">
                <select onchange={on_site}>
                    <option value="" selected={site_id.is_none()}>{"Select a site"}</option>
                    { for sites.iter().filter_map(|s| s.id.map(|id| (id, s))).map(|(id, s)| html! {
                        <option value={id.to_string()} selected={*site_id == Some(id)}>{ s.label() }</option>
                    }) }
                </select>
            </div>

            if let Some(id) = *site_id {
                <ScheduleTable site_id={id} packs={(*packs).clone()} grid={(*grid).clone()} on_cell={on_cell} read_only={true} />
            } else {
                <p class="empty">{"Select a site to see its schedule."}</p>
            }

            if let Some(pw) = (*selected).clone() {
                <section class="chart-card">
                    <h3>{ format!("{} - week {}", pw.pack, pw.week) }</h3>
                    <BoardRows boards={pw.boards} on_pick={on_pick.clone()} />
                </section>
            }

            <section class="chart-card">
                <h3>{"My boards"}</h3>
                <BoardRows boards={(*mine).clone()} on_pick={on_pick} />
            </section>

            if let Some(board) = (*checklist_board).clone() {
                <ChecklistPanel {board} on_close={on_close_checklists} />
            }
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_boards_by_pack() {
        let board = |id, pack| Board { id: Some(id), pack_id: pack, ..Default::default() };
        let boards = vec![board(1, Some(4)), board(2, None), board(3, Some(4)), board(4, Some(5))];
        let ids: Vec<_> = boards_of_pack(&boards, 4).iter().filter_map(|b| b.id).collect();
        assert_eq!(ids, vec![1, 3]);
        assert!(boards_of_pack(&boards, 9).is_empty());
    }
}
