pub mod types;
pub mod validator;
pub mod registry;

pub use types::*;
pub use validator::*;
pub use registry::*;
