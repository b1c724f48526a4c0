use std::future::Future;
use std::rc::Rc;

use chrono::{Local, NaiveDate, NaiveTime};
use client::{AppointmentClient, CalendarController, ClientConfig};
use shared::{Appointment, AppointmentForm, CalendarView, Direction, ViewState};
use yew::prelude::*;

use crate::components::appointment_list::AppointmentList;
use crate::components::appointment_modal::AppointmentModal;
use crate::components::calendar_grid::CalendarGridView;
use crate::components::calendar_toolbar::CalendarToolbar;
use crate::components::details_modal::DetailsModal;
use crate::components::notification::NotificationToast;
use crate::services::api::GlooTransport;
use crate::services::presenter::{NotificationAction, NotificationStack, YewPresenter};

type Controller = CalendarController<AppointmentClient<GlooTransport>, YewPresenter>;

#[derive(Clone, PartialEq)]
enum Modal {
    Form(AppointmentForm),
    Details(Appointment),
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Run a controller action in the background
fn spawn<F, Fut>(controller: &Rc<Controller>, action: F)
where
    F: FnOnce(Rc<Controller>) -> Fut,
    Fut: Future<Output = ()> + 'static,
{
    wasm_bindgen_futures::spawn_local(action(controller.clone()));
}

#[function_component(CalendarPage)]
pub fn calendar_page() -> Html {
    let snapshot = use_state(|| ViewState::new(CalendarView::Month, today()).snapshot());
    let notifications = use_reducer(NotificationStack::default);
    let modal = use_state(|| None::<Modal>);

    let controller = {
        let snapshot = snapshot.clone();
        let notifications = notifications.clone();
        use_memo((), move |_| {
            let config = ClientConfig::default();
            let timeout = config.notification_timeout();
            let state = ViewState::new(CalendarView::Month, today());
            let api = AppointmentClient::new(GlooTransport, config);
            CalendarController::new(api, YewPresenter::new(snapshot, notifications), state, timeout)
        })
    };

    // Initial load
    {
        let controller = controller.clone();
        use_effect_with((), move |_| {
            tracing::info!("Loading appointments calendar");
            spawn(&controller, |c| async move {
                c.reload().await;
            });
            || ()
        });
    }

    let on_navigate = {
        let controller = controller.clone();
        Callback::from(move |direction: Direction| {
            spawn(&controller, |c| async move {
                c.navigate(direction).await;
            });
        })
    };

    let on_today = {
        let controller = controller.clone();
        Callback::from(move |_: ()| {
            spawn(&controller, |c| async move {
                c.go_to(today()).await;
            });
        })
    };

    let on_view = {
        let controller = controller.clone();
        Callback::from(move |view: CalendarView| {
            spawn(&controller, |c| async move {
                c.switch_view(view).await;
            });
        })
    };

    let on_clinic = {
        let controller = controller.clone();
        Callback::from(move |clinic: Option<String>| {
            spawn(&controller, |c| async move {
                c.select_clinic(clinic).await;
            });
        })
    };

    let on_new = {
        let modal = modal.clone();
        Callback::from(move |_: ()| modal.set(Some(Modal::Form(AppointmentForm::blank()))))
    };

    let on_pick = {
        let modal = modal.clone();
        Callback::from(move |(date, time): (NaiveDate, Option<NaiveTime>)| {
            modal.set(Some(Modal::Form(AppointmentForm::for_slot(date, time))));
        })
    };

    let on_select = {
        let modal = modal.clone();
        Callback::from(move |appointment: Appointment| {
            modal.set(Some(Modal::Details(appointment)));
        })
    };

    let on_edit = {
        let modal = modal.clone();
        let controller = controller.clone();
        Callback::from(move |appointment: Appointment| {
            // prefer the freshest copy of the record
            let current = controller.find(&appointment.id).unwrap_or(appointment);
            modal.set(Some(Modal::Form(AppointmentForm::from_appointment(&current))));
        })
    };

    let on_delete = {
        let modal = modal.clone();
        let controller = controller.clone();
        Callback::from(move |id: String| {
            let modal = modal.clone();
            spawn(&controller, |c| async move {
                if c.delete(&id).await {
                    modal.set(None);
                }
            });
        })
    };

    let on_submit = {
        let modal = modal.clone();
        let controller = controller.clone();
        Callback::from(move |form: AppointmentForm| {
            let modal = modal.clone();
            spawn(&controller, |c| async move {
                if c.submit(&form).await {
                    modal.set(None);
                }
            });
        })
    };

    let on_close = {
        let modal = modal.clone();
        Callback::from(move |_: ()| modal.set(None))
    };

    let on_dismiss = {
        let notifications = notifications.clone();
        Callback::from(move |id: u64| notifications.dispatch(NotificationAction::Dismiss(id)))
    };

    let modal_view = match &*modal {
        Some(Modal::Form(form)) => html! {
            <AppointmentModal
                initial={form.clone()}
                on_submit={on_submit}
                on_close={on_close.clone()}
            />
        },
        Some(Modal::Details(appointment)) => html! {
            <DetailsModal
                appointment={appointment.clone()}
                on_edit={on_edit}
                on_delete={on_delete}
                on_close={on_close.clone()}
            />
        },
        None => html! {},
    };

    html! {
        <div class="container appointments-page">
            <CalendarToolbar
                period_label={snapshot.period_label.clone()}
                view={snapshot.view}
                selected_clinic={snapshot.selected_clinic.clone()}
                loading={snapshot.loading}
                on_navigate={on_navigate}
                on_today={on_today}
                on_view={on_view}
                on_clinic={on_clinic}
                on_new={on_new}
            />
            <div class="appointments-layout">
                <div id="calendarGrid">
                    <CalendarGridView
                        grid={snapshot.grid.clone()}
                        today={today()}
                        on_pick={on_pick}
                        on_select={on_select.clone()}
                    />
                </div>
                <aside id="appointmentsList">
                    <h3>{ "Appointments" }</h3>
                    <AppointmentList appointments={snapshot.listing.clone()} on_select={on_select} />
                </aside>
            </div>
            { modal_view }
            <div class="notifications">
                { for notifications.items.iter().map(|(id, notification)| html! {
                    <NotificationToast
                        key={*id}
                        id={*id}
                        notification={notification.clone()}
                        on_dismiss={on_dismiss.clone()}
                    />
                })}
            </div>
        </div>
    }
}
