#![doc = "Shared type vocabulary for the numeria arithmetic core."]

mod error;

pub use error::BnError;
