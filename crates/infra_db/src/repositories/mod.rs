//! Repository implementations
//!
//! One repository per table, each owning its row and input types. Queries are
//! bound at runtime so the crate builds without a live database; the schema
//! contract lives in `migrations/`.

pub mod clinics;
pub mod devices;
pub mod messages;
pub mod notifications;
pub mod plans;

pub use clinics::{ClinicChanges, ClinicRepository, ClinicRow, NewClinic};
pub use devices::{DeviceChanges, DeviceRepository, DeviceRow, NewDevice};
pub use messages::{MessageChanges, MessageRepository, MessageRow, NewMessage};
pub use notifications::{
    NewNotification, NotificationChanges, NotificationRepository, NotificationRow,
};
pub use plans::{NewPlanRecord, PlanChanges, PlanRepository, PlanRow};
