//! Users, passwords and bearer tokens.

pub mod password;
pub mod token;

pub use password::{hash_password, verify_password};
pub use token::{authenticate, bearer_token, issue_test_token, issue_token, login, revoke_all, AuthUser};
