use yew::prelude::*;
use yew_router::prelude::*;

use crate::auth::username_from_token;
use crate::logout::Logout;
use crate::menu::{visible_entries, MENU};
use crate::session::use_session;
use crate::Route;

#[derive(Properties, PartialEq)]
pub struct MainLayoutProps {
    #[prop_or_default]
    pub children: Children,
}

/// Shell around every authenticated page: header, role-filtered menu, content.
#[function_component(MainLayout)]
pub fn main_layout(props: &MainLayoutProps) -> Html {
    let session = use_session();
    let current = use_route::<Route>();

    let username = session
        .session()
        .token
        .as_deref()
        .and_then(username_from_token);
    let entries = visible_entries(session.role(), &MENU);

    html! {
        <>
            <header class="header">
                <div class="header-title">{"Maintrack"}</div>
                <div class="header-user">
                    if let Some(name) = username {
                        <span class="header-username">{ name }</span>
                    }
                    if let Some(role) = session.role() {
                        <span class="header-role">{ role.as_str() }</span>
                    }
                    <Link<Route> to={Route::Settings} classes={classes!("header-settings")}>{"Settings"}</Link<Route>>
                    <Logout />
                </div>
            </header>

            /* ---------------- menu filtré par rôle ---------------- */
            <nav class="nav">
                <ul class="nav-list">
                    { for entries.into_iter().map(|entry| {
                        let active = current.as_ref() == Some(&entry.route);
                        html! {
                            <li class={classes!("nav-item", active.then_some("active"))}>
                                <Link<Route> to={entry.route.clone()}>{ entry.label }</Link<Route>>
                            </li>
                        }
                    }) }
                </ul>
            </nav>

            <main class="main-content">
                { for props.children.iter() }
            </main>
        </>
    }
}
