//! Error types for the interactions controller.
mod controller;
mod toggle;

pub use controller::ControllerError;
pub use toggle::ToggleError;
