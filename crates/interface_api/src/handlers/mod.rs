//! Request handlers

pub mod clinics;
pub mod devices;
pub mod health;
pub mod messages;
pub mod notifications;
pub mod plans;
