//! Todo Domain
//!
//! Projects containing tasks, with lifecycle rules enforced in a service
//! layer and storage behind interchangeable repository implementations.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │  Services   │  ← Business rules: limits, uniqueness, ownership, autoclose
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repositories│  ← Data access (traits + in-memory and PostgreSQL impls)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← Entities, DTOs, enums
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use core_config::limits::LimitsConfig;
//! use domain_todo::{
//!     handlers,
//!     repository::InMemoryRepository,
//!     service::{ProjectService, TaskService},
//! };
//!
//! let store = InMemoryRepository::new();
//! let limits = LimitsConfig::default();
//!
//! let project_service = ProjectService::new(store.clone(), limits);
//! let task_service = TaskService::new(store.clone(), store, limits);
//!
//! // Create Axum router (mount under /projects)
//! let router = handlers::router(project_service, task_service);
//! ```

pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;

// Re-export commonly used types
pub use error::{TodoError, TodoResult};
pub use models::{
    ChangeTaskStatus, CreateProject, CreateTask, Project, Task, TaskStatus, UpdateProject,
    UpdateTask,
};
pub use postgres::{PgProjectRepository, PgTaskRepository};
pub use repository::{InMemoryRepository, ProjectRepository, TaskRepository};
pub use service::{ProjectService, TaskService};
