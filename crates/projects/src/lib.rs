//! Projects: budgeted jobs run for a client, against which documents are filed.

pub mod project;

pub use project::{Project, ProjectId, ProjectStatus};
