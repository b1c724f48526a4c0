use std::rc::Rc;

use client::{Notification, Presenter};
use shared::CalendarSnapshot;
use yew::prelude::*;

/// Notifications currently on screen, oldest first
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NotificationStack {
    pub items: Vec<(u64, Notification)>,
    next_id: u64,
}

pub enum NotificationAction {
    Push(Notification),
    Dismiss(u64),
}

impl Reducible for NotificationStack {
    type Action = NotificationAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut next = (*self).clone();
        match action {
            NotificationAction::Push(notification) => {
                next.items.push((next.next_id, notification));
                next.next_id += 1;
            }
            NotificationAction::Dismiss(id) => next.items.retain(|(item, _)| *item != id),
        }
        Rc::new(next)
    }
}

/// Presenter writing into Yew state hooks
pub struct YewPresenter {
    snapshot: UseStateHandle<CalendarSnapshot>,
    notifications: UseReducerHandle<NotificationStack>,
}

impl YewPresenter {
    pub fn new(
        snapshot: UseStateHandle<CalendarSnapshot>,
        notifications: UseReducerHandle<NotificationStack>,
    ) -> Self {
        Self {
            snapshot,
            notifications,
        }
    }
}

impl Presenter for YewPresenter {
    fn render(&self, snapshot: &CalendarSnapshot) {
        self.snapshot.set(snapshot.clone());
    }

    fn notify(&self, notification: Notification) {
        self.notifications
            .dispatch(NotificationAction::Push(notification));
    }

    fn confirm(&self, prompt: &str) -> bool {
        gloo::dialogs::confirm(prompt)
    }
}
