use shared::Appointment;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct AppointmentListProps {
    /// Already in listing order
    pub appointments: Vec<Appointment>,
    pub on_select: Callback<Appointment>,
}

#[function_component(AppointmentList)]
pub fn appointment_list(props: &AppointmentListProps) -> Html {
    if props.appointments.is_empty() {
        return html! {
            <div class="no-appointments">{ "No appointments found" }</div>
        };
    }

    html! {
        <div class="appointments-list">
            { for props.appointments.iter().map(|appointment| {
                let on_select = props.on_select.clone();
                let selected = appointment.clone();
                let onclick = Callback::from(move |_| on_select.emit(selected.clone()));

                html! {
                    <div class="appointment-list-item" key={appointment.id.clone()} {onclick}>
                        <div class="appointment-info">
                            <div class="patient-name">{ &appointment.patient_name }</div>
                            <div class="appointment-datetime">
                                { format!(
                                    "{} at {}",
                                    appointment.date.format("%b %-d, %Y"),
                                    appointment.time.format("%H:%M"),
                                ) }
                            </div>
                            <div class="appointment-type">{ &appointment.kind }</div>
                        </div>
                        <div class={format!("appointment-status status-{}", appointment.status)}>
                            { appointment.status.to_string() }
                        </div>
                    </div>
                }
            })}
        </div>
    }
}
