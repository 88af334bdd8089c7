use yew::prelude::*;
use yew_router::prelude::*;

mod api;
mod auth;
mod config;
mod guard;
mod layout;
mod logout;
mod menu;
mod models;
mod notice;
mod role;
mod session;
mod utils;

// pages
mod audit_logs;
mod boards;
mod bom;
mod dashboard;
mod inventory;
mod landing;
mod maintenance;
mod preventive;
mod settings;

use guard::{Access, RequireAuth, RequireRole};
use layout::MainLayout;
use notice::NoticeProvider;
use session::SessionProvider;

/* -------------------- routing -------------------- */

#[derive(Routable, Clone, PartialEq, Debug)]
pub enum Route {
    #[at("/")]
    Root,
    #[at("/login")]
    Login,
    #[at("/register")]
    Register,
    #[at("/landing")]
    Landing,
    #[at("/dashboard")]
    Dashboard,
    #[at("/inventory")]
    Inventory,
    #[at("/inventory/add")]
    InventoryAdd,
    #[at("/inventory/edit/:id")]
    InventoryEdit { id: i64 },
    #[at("/inventory/update-quantity/:id")]
    InventoryQuantity { id: i64 },
    #[at("/maintenance")]
    Maintenance,
    #[at("/maintenance/add")]
    MaintenanceAdd,
    #[at("/maintenance/edit/:id")]
    MaintenanceEdit { id: i64 },
    #[at("/preventive-maintenance/admin")]
    PreventiveAdmin,
    #[at("/preventive-maintenance/user")]
    PreventiveUser,
    #[at("/audit-logs")]
    AuditLogs,
    #[at("/boards")]
    Boards,
    #[at("/bom-management")]
    BomManagement,
    #[at("/settings")]
    Settings,
    #[not_found]
    #[at("/404")]
    NotFound,
}

/// Gate A, then gate B when the route names roles, then the shell.
fn guarded(access: Access, page: Html) -> Html {
    match access {
        Access::Public => page,
        Access::Authenticated => html! {
            <RequireAuth><MainLayout>{ page }</MainLayout></RequireAuth>
        },
        Access::Roles(roles) => html! {
            <RequireAuth>
                <RequireRole {roles}><MainLayout>{ page }</MainLayout></RequireRole>
            </RequireAuth>
        },
    }
}

fn switch(route: Route) -> Html {
    let page = match &route {
        Route::Root | Route::NotFound => return html!(<Redirect<Route> to={Route::Landing} />),
        Route::Login => html!(<auth::LoginForm />),
        Route::Register => html!(<auth::RegisterForm />),
        Route::Landing => html!(<landing::Landing />),
        Route::Dashboard => html!(<dashboard::Dashboard />),
        Route::Inventory => html!(<inventory::InventoryList />),
        Route::InventoryAdd => html!(<inventory::InventoryForm />),
        Route::InventoryEdit { id } => html!(<inventory::InventoryForm id={*id} />),
        Route::InventoryQuantity { id } => html!(<inventory::QuantityForm id={*id} />),
        Route::Maintenance => html!(<maintenance::MaintenanceList />),
        Route::MaintenanceAdd => html!(<maintenance::MaintenanceForm />),
        Route::MaintenanceEdit { id } => html!(<maintenance::MaintenanceForm id={*id} />),
        Route::PreventiveAdmin => html!(<preventive::PreventiveAdmin />),
        Route::PreventiveUser => html!(<preventive::PreventiveUser />),
        Route::AuditLogs => html!(<audit_logs::AuditLogs />),
        Route::Boards => html!(<boards::BoardInventory />),
        Route::BomManagement => html!(<bom::BomManagement />),
        Route::Settings => html!(<settings::Settings />),
    };
    guarded(route.access(), page)
}

/* -------------------- entry point ---------------- */

#[function_component(App)]
fn app() -> Html {
    html! {
        <BrowserRouter>
            <NoticeProvider>
                <SessionProvider>
                    <Switch<Route> render={switch} />
                </SessionProvider>
            </NoticeProvider>
        </BrowserRouter>
    }
}

fn main() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::new(config::log_level(cfg!(debug_assertions))));
    log::info!("maintrack front starting, API at {}", config::API_BASE_URL);
    yew::Renderer::<App>::new().render();
}
