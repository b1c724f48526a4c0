use shared::Appointment;
use yew::prelude::*;

use crate::hooks::use_escape_key;

#[derive(Properties, PartialEq)]
pub struct DetailsModalProps {
    pub appointment: Appointment,
    pub on_edit: Callback<Appointment>,
    pub on_delete: Callback<String>,
    pub on_close: Callback<()>,
}

#[function_component(DetailsModal)]
pub fn details_modal(props: &DetailsModalProps) -> Html {
    let appointment = &props.appointment;

    let close = {
        let on_close = props.on_close.clone();
        Callback::from(move |_: MouseEvent| on_close.emit(()))
    };
    use_escape_key(props.on_close.clone());

    let edit = {
        let on_edit = props.on_edit.clone();
        let appointment = appointment.clone();
        Callback::from(move |_: MouseEvent| on_edit.emit(appointment.clone()))
    };
    let delete = {
        let on_delete = props.on_delete.clone();
        let id = appointment.id.clone();
        Callback::from(move |_: MouseEvent| on_delete.emit(id.clone()))
    };

    html! {
        <div class="modal" onclick={close.clone()}>
            <div class="modal-content" onclick={Callback::from(|e: MouseEvent| e.stop_propagation())}>
                <div class="modal-header">
                    <h2>{ "Appointment Details" }</h2>
                    <span class="close" onclick={close.clone()}>{ "×" }</span>
                </div>
                <div class="modal-body">
                    <div class="appointment-details">
                        <p><strong>{ "Patient: " }</strong>{ &appointment.patient_name }</p>
                        <p><strong>{ "Date: " }</strong>{ appointment.date.format("%B %-d, %Y").to_string() }</p>
                        <p><strong>{ "Time: " }</strong>{ appointment.time.format("%H:%M").to_string() }</p>
                        <p><strong>{ "Duration: " }</strong>{ format!("{} minutes", appointment.duration_minutes) }</p>
                        <p><strong>{ "Type: " }</strong>{ &appointment.kind }</p>
                        <p><strong>{ "Priority: " }</strong>{ appointment.priority.to_string() }</p>
                        <p><strong>{ "Status: " }</strong>{ appointment.status.to_string() }</p>
                        if let Some(notes) = appointment.notes.as_deref().filter(|n| !n.is_empty()) {
                            <p><strong>{ "Notes: " }</strong>{ notes }</p>
                        }
                    </div>
                </div>
                <div class="modal-footer">
                    <button class="btn btn-primary" onclick={edit}>{ "Edit" }</button>
                    <button class="btn btn-danger" onclick={delete}>{ "Delete" }</button>
                    <button class="btn btn-secondary" onclick={close}>{ "Close" }</button>
                </div>
            </div>
        </div>
    }
}
