//! Service layer: business rules over the repository traits.

pub mod projects;
pub mod tasks;

pub use projects::ProjectService;
pub use tasks::TaskService;
