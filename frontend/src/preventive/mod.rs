//! Preventive maintenance: weekly pack schedule and board checklists.

mod admin;
mod checklist;
mod grid;
mod user;

pub use admin::PreventiveAdmin;
pub use user::PreventiveUser;
