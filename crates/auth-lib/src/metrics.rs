// ==============
// crates/auth-lib/src/metrics.rs

//! Central place for metric keys
pub const ACCOUNT_CREATED: &str = "account.created";
pub const LOGIN_OK: &str = "login.ok";
pub const LOGIN_REJECTED: &str = "login.rejected";
pub const SESSION_CREATED: &str = "session.created";
pub const SESSION_ACTIVE: &str = "session.active";
