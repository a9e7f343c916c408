pub mod photo;
pub mod registration;

pub use photo::*;
pub use registration::*;
