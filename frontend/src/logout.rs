use log::info;
use yew::prelude::*;
use yew_router::prelude::*;

use crate::session::use_session;
use crate::Route;

#[function_component(Logout)]
pub fn logout() -> Html {
    let session = use_session();
    let navigator = use_navigator();

    let onclick = Callback::from(move |_: MouseEvent| {
        // token effacé avant la navigation : la garde voit une session vide
        session.clear_session();
        info!("logout");
        if let Some(nav) = &navigator {
            nav.replace(&Route::Login);
        }
    });

    html! { <button class="logout-button" {onclick}>{ "Logout" }</button> }
}
