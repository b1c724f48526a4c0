use chrono::Local;
use yew::prelude::*;
use yew_router::prelude::*;

use crate::router::Route;

/// Fallback for unknown paths; the calendar lives at `/`
#[function_component(NotFound)]
pub fn not_found() -> Html {
    let today = Local::now().date_naive().format("%A, %B %-d, %Y").to_string();

    html! {
        <div class="container appointments-page">
            <div class="calendar-empty">
                <h2>{ "No calendar here" }</h2>
                <p>{ "This address does not match any appointment view." }</p>
                <p class="calendar-empty-date">{ format!("Today is {today}.") }</p>
                <Link<Route> to={Route::Calendar} classes={classes!("btn", "btn-primary")}>
                    { "Open today's calendar" }
                </Link<Route>>
            </div>
        </div>
    }
}
