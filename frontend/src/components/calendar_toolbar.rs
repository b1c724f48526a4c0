use shared::{CalendarView, Direction};
use web_sys::HtmlInputElement;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct CalendarToolbarProps {
    pub period_label: String,
    pub view: CalendarView,
    pub selected_clinic: Option<String>,
    pub loading: bool,
    pub on_navigate: Callback<Direction>,
    pub on_today: Callback<()>,
    pub on_view: Callback<CalendarView>,
    pub on_clinic: Callback<Option<String>>,
    pub on_new: Callback<()>,
}

#[function_component(CalendarToolbar)]
pub fn calendar_toolbar(props: &CalendarToolbarProps) -> Html {
    let step = |direction: Direction| {
        let on_navigate = props.on_navigate.clone();
        Callback::from(move |_: MouseEvent| on_navigate.emit(direction))
    };

    let on_today = {
        let on_today = props.on_today.clone();
        Callback::from(move |_: MouseEvent| on_today.emit(()))
    };

    let on_new = {
        let on_new = props.on_new.clone();
        Callback::from(move |_: MouseEvent| on_new.emit(()))
    };

    let on_clinic = {
        let on_clinic = props.on_clinic.clone();
        Callback::from(move |e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            let value = input.value();
            on_clinic.emit((!value.trim().is_empty()).then_some(value));
        })
    };

    html! {
        <div class="calendar-toolbar">
            <div class="calendar-nav">
                <button class="btn" id="prevBtn" onclick={step(Direction::Previous)}>{ "‹" }</button>
                <button class="btn" id="todayBtn" onclick={on_today}>{ "Today" }</button>
                <button class="btn" id="nextBtn" onclick={step(Direction::Next)}>{ "›" }</button>
                <h2 id="currentPeriod">{ &props.period_label }</h2>
                if props.loading {
                    <div class="spinner"></div>
                }
            </div>
            <div class="calendar-views">
                { for CalendarView::ALL.into_iter().map(|view| {
                    let on_view = props.on_view.clone();
                    let class = if view == props.view { "view-btn active" } else { "view-btn" };
                    html! {
                        <button {class} onclick={Callback::from(move |_: MouseEvent| on_view.emit(view))}>
                            { view.label() }
                        </button>
                    }
                })}
            </div>
            <div class="calendar-actions">
                <input
                    type="text"
                    id="clinicSelect"
                    placeholder="Clinic ID"
                    value={props.selected_clinic.clone().unwrap_or_default()}
                    onchange={on_clinic}
                />
                <button class="btn btn-primary" id="newAppointmentBtn" onclick={on_new}>
                    { "New Appointment" }
                </button>
            </div>
        </div>
    }
}
