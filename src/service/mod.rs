//! CrudService and FormValidator: generic persistence and form handling over descriptors.

mod crud;
mod validation;
pub use crud::{CrudService, RecordOption, BULK_LIMIT};
pub use validation::{FormValidator, Mode};
