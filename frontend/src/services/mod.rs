pub mod api;
pub mod presenter;
