use shared::{AppointmentForm, AppointmentStatus, Priority};
use web_sys::{HtmlInputElement, HtmlSelectElement, HtmlTextAreaElement};
use yew::prelude::*;

use crate::hooks::use_escape_key;

#[derive(Properties, PartialEq)]
pub struct AppointmentModalProps {
    pub initial: AppointmentForm,
    pub on_submit: Callback<AppointmentForm>,
    pub on_close: Callback<()>,
}

type Apply = fn(&mut AppointmentForm, String);

fn bind_input(form: &UseStateHandle<AppointmentForm>, apply: Apply) -> Callback<InputEvent> {
    let form = form.clone();
    Callback::from(move |e: InputEvent| {
        let input: HtmlInputElement = e.target_unchecked_into();
        let mut next = (*form).clone();
        apply(&mut next, input.value());
        form.set(next);
    })
}

fn bind_select(form: &UseStateHandle<AppointmentForm>, apply: Apply) -> Callback<Event> {
    let form = form.clone();
    Callback::from(move |e: Event| {
        let select: HtmlSelectElement = e.target_unchecked_into();
        let mut next = (*form).clone();
        apply(&mut next, select.value());
        form.set(next);
    })
}

fn bind_textarea(form: &UseStateHandle<AppointmentForm>, apply: Apply) -> Callback<InputEvent> {
    let form = form.clone();
    Callback::from(move |e: InputEvent| {
        let area: HtmlTextAreaElement = e.target_unchecked_into();
        let mut next = (*form).clone();
        apply(&mut next, area.value());
        form.set(next);
    })
}

/// New/edit appointment dialog
#[function_component(AppointmentModal)]
pub fn appointment_modal(props: &AppointmentModalProps) -> Html {
    let form = use_state(|| props.initial.clone());

    let onsubmit = {
        let form = form.clone();
        let on_submit = props.on_submit.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            on_submit.emit((*form).clone());
        })
    };

    let close = {
        let on_close = props.on_close.clone();
        Callback::from(move |_: MouseEvent| on_close.emit(()))
    };

    use_escape_key(props.on_close.clone());

    let title = if form.is_edit() {
        "Edit Appointment"
    } else {
        "New Appointment"
    };

    html! {
        <div class="modal" id="newAppointmentModal" onclick={close.clone()}>
            <div class="modal-content" onclick={Callback::from(|e: MouseEvent| e.stop_propagation())}>
                <div class="modal-header">
                    <h2>{ title }</h2>
                    <span class="close" onclick={close.clone()}>{ "×" }</span>
                </div>
                <form id="newAppointmentForm" {onsubmit}>
                    <label>
                        { "Patient name *" }
                        <input
                            type="text"
                            name="patient_name"
                            value={form.patient_name.clone()}
                            oninput={bind_input(&form, |f, v| f.patient_name = v)}
                        />
                    </label>
                    <label>
                        { "Date *" }
                        <input
                            type="date"
                            name="date"
                            id="appointmentDate"
                            value={form.date.clone()}
                            oninput={bind_input(&form, |f, v| f.date = v)}
                        />
                    </label>
                    <label>
                        { "Time *" }
                        <input
                            type="time"
                            name="time"
                            id="appointmentTime"
                            value={form.time.clone()}
                            oninput={bind_input(&form, |f, v| f.time = v)}
                        />
                    </label>
                    <label>
                        { "Duration (minutes)" }
                        <input
                            type="number"
                            name="duration"
                            min="1"
                            value={form.duration.clone()}
                            oninput={bind_input(&form, |f, v| f.duration = v)}
                        />
                    </label>
                    <label>
                        { "Type" }
                        <input
                            type="text"
                            name="type"
                            value={form.kind.clone()}
                            oninput={bind_input(&form, |f, v| f.kind = v)}
                        />
                    </label>
                    <label>
                        { "Priority" }
                        <select
                            name="priority"
                            onchange={bind_select(&form, |f, v| f.priority = Priority::parse(&v).unwrap_or_default())}
                        >
                            { for Priority::ALL.into_iter().map(|p| html! {
                                <option value={p.as_str()} selected={p == form.priority}>{ p.as_str() }</option>
                            })}
                        </select>
                    </label>
                    if form.is_edit() {
                        <label>
                            { "Status" }
                            <select
                                name="status"
                                onchange={bind_select(&form, |f, v| f.status = AppointmentStatus::parse(&v).unwrap_or_default())}
                            >
                                { for AppointmentStatus::ALL.into_iter().map(|s| html! {
                                    <option value={s.as_str()} selected={s == form.status}>{ s.as_str() }</option>
                                })}
                            </select>
                        </label>
                    }
                    <label>
                        { "Patient ID" }
                        <input
                            type="text"
                            name="patient_id"
                            value={form.patient_id.clone()}
                            oninput={bind_input(&form, |f, v| f.patient_id = v)}
                        />
                    </label>
                    <label>
                        { "Notes" }
                        <textarea
                            name="notes"
                            value={form.notes.clone()}
                            oninput={bind_textarea(&form, |f, v| f.notes = v)}
                        />
                    </label>
                    <div class="modal-footer">
                        <button type="button" class="btn btn-cancel" onclick={close}>{ "Cancel" }</button>
                        <button type="submit" class="btn btn-primary">{ "Save" }</button>
                    </div>
                </form>
            </div>
        </div>
    }
}
