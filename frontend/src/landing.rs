use yew::prelude::*;
use yew_router::prelude::*;

use crate::menu::{visible_entries, MenuEntry, MENU};
use crate::session::use_session;
use crate::Route;

fn describe(route: &Route) -> &'static str {
    match route {
        Route::Dashboard => "Stock and intervention statistics.",
        Route::Inventory => "Spare parts, quantities and prices.",
        Route::Maintenance => "Corrective interventions log.",
        Route::PreventiveAdmin => "Sites, packs, projects and the weekly schedule.",
        Route::PreventiveUser => "Weekly schedule and board checklists.",
        Route::AuditLogs => "Who did what, and when.",
        Route::Boards => "Fixture boards inventory.",
        Route::BomManagement => "Bills of materials per board.",
        _ => "",
    }
}

/// Cards for the landing page: the visible menu minus the landing entry itself.
pub fn landing_cards(entries: Vec<MenuEntry>) -> Vec<MenuEntry> {
    entries.into_iter().filter(|e| e.route != Route::Landing).collect()
}

#[function_component(Landing)]
pub fn landing() -> Html {
    let session = use_session();
    let cards = landing_cards(visible_entries(session.role(), &MENU));

    html! {
        <div class="landing">
            <h1>{"Welcome to Maintrack"}</h1>
            <p>{"Pick a module to get started."}</p>
            <div class="card-grid">
                { for cards.into_iter().map(|entry| html! {
                    <Link<Route> to={entry.route.clone()} classes={classes!("card")}>
                        <h3>{ entry.label }</h3>
                        <p>{ describe(&entry.route) }</p>
                    </Link<Route>>
                }) }
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::role::Role;

    #[test]
    fn landing_is_not_its_own_card() {
        let cards = landing_cards(visible_entries(Some(Role::User), &MENU));
        let routes: Vec<Route> = cards.into_iter().map(|e| e.route).collect();
        assert_eq!(
            routes,
            vec![Route::Inventory, Route::Maintenance, Route::PreventiveUser]
        );
    }
}
