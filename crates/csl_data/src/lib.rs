pub mod record;
pub mod validate;

pub use record::{CitationType, CslRecord, DateVariable, FacsimileLink, Name};
pub use validate::{validate_records, ValidationError};
