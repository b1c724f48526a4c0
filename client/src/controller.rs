//! Calendar controller: owns the view state, drives the appointments API and
//! reports to a presenter.
//!
//! The controller is single-threaded. State lives in a `RefCell` that is
//! never borrowed across an `.await`, so one controller can be shared behind
//! an `Rc` and have several actions in flight at once. Overlapping loads are
//! resolved by [`ViewState`]: only the latest one may replace the data.

use std::cell::RefCell;
use std::time::Duration;

use chrono::NaiveDate;
use shared::api::AppointmentPatch;
use shared::{Appointment, AppointmentForm, CalendarSnapshot, CalendarView, Direction, ViewState};
use tracing::{debug, error, info};

use crate::appointments::{AppointmentApi, Operation};
use crate::error::ClientError;

/// Question asked before any delete request
pub const DELETE_PROMPT: &str = "Are you sure you want to delete this appointment?";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Error,
    Info,
}

impl NotificationLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Info => "info",
        }
    }
}

/// Transient message shown to the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
    pub dismiss_after: Duration,
}

/// UI side of the calendar
pub trait Presenter {
    /// Draw the calendar from scratch
    fn render(&self, snapshot: &CalendarSnapshot);

    fn notify(&self, notification: Notification);

    /// Blocking yes/no question
    fn confirm(&self, prompt: &str) -> bool;
}

pub struct CalendarController<A, P> {
    api: A,
    presenter: P,
    state: RefCell<ViewState>,
    notification_timeout: Duration,
}

impl<A, P> CalendarController<A, P>
where
    A: AppointmentApi,
    P: Presenter,
{
    pub fn new(api: A, presenter: P, state: ViewState, notification_timeout: Duration) -> Self {
        Self {
            api,
            presenter,
            state: RefCell::new(state),
            notification_timeout,
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn snapshot(&self) -> CalendarSnapshot {
        self.state.borrow().snapshot()
    }

    /// Currently loaded appointment with `id`
    pub fn find(&self, id: &str) -> Option<Appointment> {
        self.state.borrow().find(id).cloned()
    }

    pub fn render(&self) {
        let snapshot = self.snapshot();
        self.presenter.render(&snapshot);
    }

    /// Fetch the visible range and redraw. Returns whether the response was
    /// applied; superseded responses are dropped silently.
    pub async fn reload(&self) -> bool {
        let ticket = self.state.borrow_mut().begin_load();
        self.render();

        let result = self.api.list(&ticket.query).await;

        let (applied, failure) = {
            let mut state = self.state.borrow_mut();
            match result {
                Ok(appointments) => {
                    let count = appointments.len();
                    let applied = state.finish_load(&ticket, appointments);
                    debug!(sequence = ticket.sequence, count, applied, "appointments loaded");
                    (applied, None)
                }
                Err(err) => {
                    let current = state.fail_load(&ticket);
                    debug!(sequence = ticket.sequence, current, "appointments load failed");
                    (false, current.then_some(err))
                }
            }
        };

        if let Some(err) = failure {
            self.report_failure(Operation::List, &err);
        }
        if applied || self.state.borrow().is_current(&ticket) {
            self.render();
        }
        applied
    }

    pub async fn navigate(&self, direction: Direction) -> bool {
        self.state.borrow_mut().navigate(direction);
        self.reload().await
    }

    pub async fn go_to(&self, date: NaiveDate) -> bool {
        self.state.borrow_mut().go_to(date);
        self.reload().await
    }

    pub async fn switch_view(&self, view: CalendarView) -> bool {
        self.state.borrow_mut().switch_view(view);
        self.reload().await
    }

    pub async fn select_clinic(&self, clinic_id: Option<String>) -> bool {
        self.state.borrow_mut().select_clinic(clinic_id);
        self.reload().await
    }

    /// Create or update from the appointment dialog. Returns true when the
    /// server accepted the change, which is the caller's cue to close the
    /// dialog.
    pub async fn submit(&self, form: &AppointmentForm) -> bool {
        match &form.appointment_id {
            Some(id) => match form.to_patch() {
                Ok(patch) => self.update(id, &patch).await,
                Err(err) => {
                    self.report_failure(Operation::Update, &err.into());
                    false
                }
            },
            None => self.create(form).await,
        }
    }

    pub async fn create(&self, form: &AppointmentForm) -> bool {
        let draft = {
            let state = self.state.borrow();
            form.to_new_appointment(state.selected_clinic())
        };
        let draft = match draft {
            Ok(draft) => draft,
            Err(err) => {
                self.report_failure(Operation::Create, &err.into());
                return false;
            }
        };

        match self.api.create(&draft).await {
            Ok(ack) => {
                info!(appointment_id = ?ack.appointment_id, "appointment created");
                self.report_success(ack.message);
                self.reload().await;
                true
            }
            Err(err) => {
                self.report_failure(Operation::Create, &err);
                false
            }
        }
    }

    pub async fn update(&self, id: &str, patch: &AppointmentPatch) -> bool {
        match self.api.update(id, patch).await {
            Ok(ack) => {
                info!(appointment_id = id, "appointment updated");
                self.report_success(ack.message);
                self.reload().await;
                true
            }
            Err(err) => {
                self.report_failure(Operation::Update, &err);
                false
            }
        }
    }

    /// Delete after the user confirms. A declined prompt sends nothing.
    pub async fn delete(&self, id: &str) -> bool {
        if !self.presenter.confirm(DELETE_PROMPT) {
            debug!(appointment_id = id, "delete declined");
            return false;
        }

        match self.api.delete(id).await {
            Ok(ack) => {
                info!(appointment_id = id, "appointment deleted");
                self.report_success(ack.message);
                self.reload().await;
                true
            }
            Err(err) => {
                self.report_failure(Operation::Delete, &err);
                false
            }
        }
    }

    fn report_success(&self, message: String) {
        self.presenter.notify(Notification {
            level: NotificationLevel::Success,
            message,
            dismiss_after: self.notification_timeout,
        });
    }

    fn report_failure(&self, operation: Operation, err: &ClientError) {
        error!(%operation, error = %err, "appointment operation failed");
        let message = match err {
            ClientError::Validation(_) => err.to_string(),
            _ => format!("Failed to {}: {}", operation.verb(), err),
        };
        self.presenter.notify(Notification {
            level: NotificationLevel::Error,
            message,
            dismiss_after: self.notification_timeout,
        });
    }
}
