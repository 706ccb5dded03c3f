//! Result data model for link checks
//!
//! # Components
//!
//! - `LinkStatus`: The classified outcome of a single link
//! - `LinkResult`: Everything recorded about one checked link
//! - `CheckResult`: The immutable summary produced at the end of a run

mod check_result;
mod link_result;
mod link_status;

// Re-export main types
pub use check_result::CheckResult;
pub use link_result::LinkResult;
pub use link_status::LinkStatus;
