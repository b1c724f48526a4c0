pub mod appointment_card;
pub mod appointment_list;
pub mod appointment_modal;
pub mod calendar_grid;
pub mod calendar_toolbar;
pub mod details_modal;
pub mod header;
pub mod notification;
