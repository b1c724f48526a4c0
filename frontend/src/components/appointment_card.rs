use shared::Appointment;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct AppointmentCardProps {
    pub appointment: Appointment,
    pub on_select: Callback<Appointment>,
}

#[function_component(AppointmentCard)]
pub fn appointment_card(props: &AppointmentCardProps) -> Html {
    let appointment = &props.appointment;

    let onclick = {
        let on_select = props.on_select.clone();
        let appointment = appointment.clone();
        Callback::from(move |e: MouseEvent| {
            // keep the enclosing day/slot from opening the new-appointment dialog
            e.stop_propagation();
            on_select.emit(appointment.clone());
        })
    };

    html! {
        <div class={format!("appointment appointment-{}", appointment.priority)} {onclick}>
            <div class="appointment-time">{ appointment.time.format("%H:%M").to_string() }</div>
            <div class="appointment-patient">{ &appointment.patient_name }</div>
            <div class="appointment-type">{ &appointment.kind }</div>
        </div>
    }
}
