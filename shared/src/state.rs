use chrono::NaiveDate;

use crate::api::ListAppointmentsQuery;
use crate::calendar::{
    compute_visible_range, partition_by_date, period_label, shift_anchor, sort_for_listing,
    CalendarGrid, CalendarView, DateRange, Direction,
};
use crate::models::Appointment;

/// A `list` request issued for the state at a point in time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    pub sequence: u64,
    pub query: ListAppointmentsQuery,
}

/// Everything the presentation layer needs to draw one frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarSnapshot {
    pub view: CalendarView,
    pub anchor: NaiveDate,
    pub range: DateRange,
    pub period_label: String,
    pub selected_clinic: Option<String>,
    pub grid: CalendarGrid,
    pub listing: Vec<Appointment>,
    pub loading: bool,
}

/// UI state of the calendar.
///
/// The appointment set is only ever replaced as a whole, and only by the
/// response to the most recently issued load.
#[derive(Debug, Clone)]
pub struct ViewState {
    view: CalendarView,
    anchor: NaiveDate,
    selected_clinic: Option<String>,
    appointments: Vec<Appointment>,
    issued: u64,
    settled: u64,
}

impl ViewState {
    pub fn new(view: CalendarView, anchor: NaiveDate) -> Self {
        Self {
            view,
            anchor,
            selected_clinic: None,
            appointments: Vec::new(),
            issued: 0,
            settled: 0,
        }
    }

    pub fn view(&self) -> CalendarView {
        self.view
    }

    pub fn anchor(&self) -> NaiveDate {
        self.anchor
    }

    pub fn selected_clinic(&self) -> Option<&str> {
        self.selected_clinic.as_deref()
    }

    pub fn appointments(&self) -> &[Appointment] {
        &self.appointments
    }

    pub fn find(&self, id: &str) -> Option<&Appointment> {
        self.appointments.iter().find(|a| a.id == id)
    }

    pub fn visible_range(&self) -> DateRange {
        compute_visible_range(self.view, self.anchor)
    }

    pub fn navigate(&mut self, direction: Direction) {
        self.anchor = shift_anchor(self.view, self.anchor, direction);
    }

    pub fn go_to(&mut self, date: NaiveDate) {
        self.anchor = date;
    }

    pub fn switch_view(&mut self, view: CalendarView) {
        self.view = view;
    }

    pub fn select_clinic(&mut self, clinic_id: Option<String>) {
        self.selected_clinic = clinic_id.filter(|c| !c.trim().is_empty());
    }

    /// Register a new load for the current range and filter
    pub fn begin_load(&mut self) -> LoadTicket {
        self.issued += 1;
        let range = self.visible_range();
        LoadTicket {
            sequence: self.issued,
            query: ListAppointmentsQuery {
                start_date: range.start,
                end_date: range.end,
                clinic_id: self.selected_clinic.clone(),
            },
        }
    }

    /// Apply a successful load. Returns false, leaving the state untouched,
    /// when a newer load has been issued since `ticket`.
    pub fn finish_load(&mut self, ticket: &LoadTicket, appointments: Vec<Appointment>) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.appointments = appointments;
        self.settled = ticket.sequence;
        true
    }

    /// Settle a failed load without touching the appointment set. Returns
    /// false for superseded tickets.
    pub fn fail_load(&mut self, ticket: &LoadTicket) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.settled = ticket.sequence;
        true
    }

    pub fn is_current(&self, ticket: &LoadTicket) -> bool {
        ticket.sequence == self.issued
    }

    pub fn is_loading(&self) -> bool {
        self.settled < self.issued
    }

    pub fn grid(&self) -> CalendarGrid {
        partition_by_date(&self.appointments, self.view, self.anchor)
    }

    pub fn listing(&self) -> Vec<Appointment> {
        let mut listing = self.appointments.clone();
        sort_for_listing(&mut listing);
        listing
    }

    pub fn snapshot(&self) -> CalendarSnapshot {
        CalendarSnapshot {
            view: self.view,
            anchor: self.anchor,
            range: self.visible_range(),
            period_label: period_label(self.view, self.anchor),
            selected_clinic: self.selected_clinic.clone(),
            grid: self.grid(),
            listing: self.listing(),
            loading: self.is_loading(),
        }
    }
}
