use client::Notification;
use gloo::timers::callback::Timeout;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct NotificationToastProps {
    pub id: u64,
    pub notification: Notification,
    pub on_dismiss: Callback<u64>,
}

/// Toast that removes itself after its delay or on click
#[function_component(NotificationToast)]
pub fn notification_toast(props: &NotificationToastProps) -> Html {
    {
        let id = props.id;
        let delay = props.notification.dismiss_after.as_millis().min(u128::from(u32::MAX)) as u32;
        let on_dismiss = props.on_dismiss.clone();
        use_effect_with(id, move |_| {
            let timeout = Timeout::new(delay, move || on_dismiss.emit(id));
            move || drop(timeout)
        });
    }

    let close = {
        let id = props.id;
        let on_dismiss = props.on_dismiss.clone();
        Callback::from(move |_: MouseEvent| on_dismiss.emit(id))
    };

    html! {
        <div class={format!("notification notification-{} show", props.notification.level.as_str())}>
            <div class="notification-content">
                <span class="notification-message">{ &props.notification.message }</span>
                <button class="notification-close" onclick={close}>{ "×" }</button>
            </div>
        </div>
    }
}
