mod cents;
mod secret;

pub mod helpers;

pub use cents::{Cents, CentsConversionError};
pub use secret::Secret;
