pub mod api;
pub mod calendar;
pub mod form;
pub mod models;
pub mod state;

pub use calendar::{CalendarView, DateRange, Direction};
pub use form::{AppointmentForm, FormError};
pub use models::{Appointment, AppointmentStatus, Priority};
pub use state::{CalendarSnapshot, LoadTicket, ViewState};
