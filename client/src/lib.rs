//! Appointments client: REST transport with endpoint fallback and the
//! calendar controller that drives it.

pub mod appointments;
pub mod config;
pub mod controller;
pub mod error;
pub mod transport;

pub use appointments::{AppointmentApi, AppointmentClient, Operation};
pub use config::ClientConfig;
pub use controller::{CalendarController, Notification, NotificationLevel, Presenter};
pub use error::{ClientError, ClientResult, SendError, TransportError};
pub use transport::{ApiRequest, ApiResponse, Method, Transport};

#[cfg(feature = "native")]
pub use transport::ReqwestTransport;
