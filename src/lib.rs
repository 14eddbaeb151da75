//! Headless task-list page: a REST-backed task collection with form
//! validation, selection/bulk actions, and path routing. The HTTP server
//! behind `/tasks` and the visual layer are the embedding host's concern.

pub mod api;
pub mod controller;
pub mod logging;
pub mod models;
pub mod routes;
pub mod validate;

pub use api::{ApiError, HttpTasksApi, TasksApi};
pub use controller::{PageUi, TaskPage};
pub use models::{Task, TaskDraft};
