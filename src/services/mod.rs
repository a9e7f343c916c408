pub mod registration;

pub use registration::{RegistrationForm, RegistrationService};
