//! The task page controller.
//!
//! `TaskPage` owns the in-memory task collection and the form state for one
//! page session and orchestrates every backend mutation, reconciling local
//! state with server responses. It is a cloneable handle over shared state;
//! all methods take `&self` and the lock is never held across an await.
//!
//! Confirmation dialogs and alerts are injected through [`PageUi`] so the
//! controller stays headless and testable.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use futures_util::future::join_all;

use crate::api::TasksApi;
use crate::models::{Task, TaskDraft};
use crate::validate::{self, Validation};

pub const LOAD_ERROR_MESSAGE: &str = "Failed to load tasks. Try again.";
pub const SAVE_ERROR_MESSAGE: &str = "Failed to save task. Try again.";
pub const SUBMIT_INVALID_MESSAGE: &str =
    "Title and description must each be 5-500 characters; titles allow letters, numbers and spaces only.";
pub const TOGGLE_ERROR_ALERT: &str = "Failed to update task status. Try again.";
pub const DELETE_ERROR_ALERT: &str = "Failed to delete task. Try again.";
pub const BULK_DELETE_ERROR_ALERT: &str =
    "Failed to delete some tasks. The list has been refreshed.";
pub const BULK_DELETE_STALE_ALERT: &str =
    "Failed to delete some tasks. The list could not be refreshed.";

/// Host-provided modality for blocking confirmations and alert-level errors.
pub trait PageUi {
    fn confirm(&self, message: &str) -> bool;
    fn alert(&self, message: &str);
}

pub struct TaskPage<A, U> {
    api: Arc<A>,
    ui: Arc<U>,
    inner: Arc<Mutex<PageData>>,
}

impl<A, U> Clone for TaskPage<A, U> {
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
            ui: Arc::clone(&self.ui),
            inner: Arc::clone(&self.inner),
        }
    }
}

#[derive(Debug, Default)]
struct PageData {
    tasks: Vec<Task>,
    title: String,
    description: String,
    error: Option<String>,
    load_error: Option<String>,
    editing_id: Option<String>,
    selected: HashSet<String>,
    in_flight: HashSet<String>,
    saving: bool,
}

impl<A: TasksApi, U: PageUi> TaskPage<A, U> {
    pub fn new(api: A, ui: U) -> Self {
        Self {
            api: Arc::new(api),
            ui: Arc::new(ui),
            inner: Arc::new(Mutex::new(PageData::default())),
        }
    }

    // ---- read accessors -------------------------------------------------

    pub fn tasks(&self) -> Vec<Task> {
        let guard = self.inner.lock().expect("state poisoned");
        guard.tasks.clone()
    }

    pub fn title(&self) -> String {
        let guard = self.inner.lock().expect("state poisoned");
        guard.title.clone()
    }

    pub fn description(&self) -> String {
        let guard = self.inner.lock().expect("state poisoned");
        guard.description.clone()
    }

    pub fn error(&self) -> Option<String> {
        let guard = self.inner.lock().expect("state poisoned");
        guard.error.clone()
    }

    pub fn load_error(&self) -> Option<String> {
        let guard = self.inner.lock().expect("state poisoned");
        guard.load_error.clone()
    }

    pub fn editing_id(&self) -> Option<String> {
        let guard = self.inner.lock().expect("state poisoned");
        guard.editing_id.clone()
    }

    pub fn selected(&self) -> HashSet<String> {
        let guard = self.inner.lock().expect("state poisoned");
        guard.selected.clone()
    }

    /// Live per-field diagnostics for the current form values.
    pub fn field_errors(&self) -> Validation {
        let guard = self.inner.lock().expect("state poisoned");
        Validation::check(&guard.title, &guard.description)
    }

    pub fn can_submit(&self) -> bool {
        let guard = self.inner.lock().expect("state poisoned");
        validate::can_submit(&guard.title, &guard.description)
    }

    // ---- form fields ----------------------------------------------------

    pub fn set_title(&self, title: impl Into<String>) {
        let mut guard = self.inner.lock().expect("state poisoned");
        guard.title = title.into();
    }

    pub fn set_description(&self, description: impl Into<String>) {
        let mut guard = self.inner.lock().expect("state poisoned");
        guard.description = description.into();
    }

    /// Copies an existing task's fields into the form and opens an edit
    /// session. Returns `false` for an unknown id. No network call.
    pub fn begin_edit(&self, task_id: &str) -> bool {
        let mut guard = self.inner.lock().expect("state poisoned");
        let Some(task) = guard.tasks.iter().find(|t| t.id == task_id).cloned() else {
            return false;
        };
        guard.title = task.title;
        guard.description = task.description;
        guard.editing_id = Some(task.id);
        guard.error = None;
        true
    }

    // ---- selection ------------------------------------------------------

    pub fn toggle_selected(&self, task_id: &str) {
        let mut guard = self.inner.lock().expect("state poisoned");
        if guard.selected.remove(task_id) {
            return;
        }
        // Only ids present in the list are selectable.
        if guard.tasks.iter().any(|t| t.id == task_id) {
            guard.selected.insert(task_id.to_string());
        }
    }

    pub fn select_all(&self) {
        let mut guard = self.inner.lock().expect("state poisoned");
        let ids: HashSet<String> = guard.tasks.iter().map(|t| t.id.clone()).collect();
        guard.selected = ids;
    }

    pub fn clear_selection(&self) {
        let mut guard = self.inner.lock().expect("state poisoned");
        guard.selected.clear();
    }

    // ---- backend operations ---------------------------------------------

    /// Fetches the full collection and replaces local state wholesale.
    /// On failure the list is left as-is and a visible load error is set;
    /// calling `load` again is the manual retry.
    pub async fn load(&self) -> bool {
        match self.api.list_tasks().await {
            Ok(tasks) => {
                let mut guard = self.inner.lock().expect("state poisoned");
                let data = &mut *guard;
                data.tasks = dedupe_by_id(tasks);
                data.load_error = None;
                // A reload can drop rows the selection still references.
                let tasks = &data.tasks;
                data.selected.retain(|id| tasks.iter().any(|t| &t.id == id));
                true
            }
            Err(err) => {
                log::warn!("failed to load tasks: {err}");
                let mut guard = self.inner.lock().expect("state poisoned");
                guard.load_error = Some(LOAD_ERROR_MESSAGE.to_string());
                false
            }
        }
    }

    /// Submits the form: create when idle, full-replace update during an
    /// edit session. Invalid drafts set the general error and never reach
    /// the network.
    pub async fn submit(&self) -> bool {
        let (title, description, editing_id) = {
            let guard = self.inner.lock().expect("state poisoned");
            (
                guard.title.clone(),
                guard.description.clone(),
                guard.editing_id.clone(),
            )
        };

        if !validate::can_submit(&title, &description) {
            let mut guard = self.inner.lock().expect("state poisoned");
            guard.error = Some(SUBMIT_INVALID_MESSAGE.to_string());
            return false;
        }

        // Double-click protection for the whole form.
        {
            let mut guard = self.inner.lock().expect("state poisoned");
            if guard.saving {
                log::warn!("submit ignored; a save is already in flight");
                return false;
            }
            guard.saving = true;
        }

        let result = match editing_id {
            Some(id) => self.submit_update(&id, title, description).await,
            None => self.submit_create(title, description).await,
        };

        self.inner.lock().expect("state poisoned").saving = false;
        result
    }

    async fn submit_create(&self, title: String, description: String) -> bool {
        let draft = TaskDraft { title, description };
        match self.api.create_task(&draft).await {
            Ok(task) => {
                let mut guard = self.inner.lock().expect("state poisoned");
                guard.tasks.push(task);
                guard.title.clear();
                guard.description.clear();
                guard.error = None;
                true
            }
            Err(err) => {
                log::warn!("failed to create task: {err}");
                // Nothing was added, so the fields stay populated for retry.
                let mut guard = self.inner.lock().expect("state poisoned");
                guard.error = Some(SAVE_ERROR_MESSAGE.to_string());
                false
            }
        }
    }

    async fn submit_update(&self, task_id: &str, title: String, description: String) -> bool {
        // Full replacement; the completion flag is carried over from the
        // local copy so the update cannot silently flip it.
        let completed = {
            let guard = self.inner.lock().expect("state poisoned");
            guard
                .tasks
                .iter()
                .find(|t| t.id == task_id)
                .map(|t| t.completed)
                .unwrap_or(false)
        };

        if !self.begin_request(task_id) {
            log::warn!("update ignored; request already in flight id={task_id}");
            return false;
        }
        let task = Task {
            id: task_id.to_string(),
            title,
            description,
            completed,
        };
        let result = self.api.update_task(&task).await;
        self.end_request(task_id);

        match result {
            Ok(updated) => {
                let mut guard = self.inner.lock().expect("state poisoned");
                if let Some(existing) = guard.tasks.iter_mut().find(|t| t.id == updated.id) {
                    *existing = updated;
                }
                guard.editing_id = None;
                guard.title.clear();
                guard.description.clear();
                guard.error = None;
                true
            }
            Err(err) => {
                log::warn!("failed to update task id={task_id}: {err}");
                // The edit session stays open so the user can retry.
                let mut guard = self.inner.lock().expect("state poisoned");
                guard.error = Some(SAVE_ERROR_MESSAGE.to_string());
                false
            }
        }
    }

    /// Flips a task's completion state through the backend and adopts the
    /// server's authoritative value. Idempotent per click.
    pub async fn toggle_task(&self, task_id: &str) -> bool {
        if !self.begin_request(task_id) {
            log::warn!("toggle ignored; request already in flight id={task_id}");
            return false;
        }
        let result = self.api.toggle_task(task_id).await;
        self.end_request(task_id);

        match result {
            Ok(updated) => {
                let mut guard = self.inner.lock().expect("state poisoned");
                if let Some(existing) = guard.tasks.iter_mut().find(|t| t.id == updated.id) {
                    *existing = updated;
                }
                true
            }
            Err(err) => {
                log::warn!("failed to toggle task id={task_id}: {err}");
                self.ui.alert(TOGGLE_ERROR_ALERT);
                false
            }
        }
    }

    /// Deletes one task after confirmation. The local entry is removed only
    /// after the backend confirms; there is no optimistic removal.
    pub async fn delete_task(&self, task_id: &str) -> bool {
        if !self.ui.confirm("Delete this task?") {
            return false;
        }
        if !self.begin_request(task_id) {
            log::warn!("delete ignored; request already in flight id={task_id}");
            return false;
        }
        let result = self.api.delete_task(task_id).await;
        self.end_request(task_id);

        match result {
            Ok(()) => {
                let mut guard = self.inner.lock().expect("state poisoned");
                guard.tasks.retain(|t| t.id != task_id);
                guard.selected.remove(task_id);
                true
            }
            Err(err) => {
                log::warn!("failed to delete task id={task_id}: {err}");
                self.ui.alert(DELETE_ERROR_ALERT);
                false
            }
        }
    }

    /// Deletes every selected task, issuing the requests concurrently. Local
    /// entries are removed and the selection cleared only on full success;
    /// any failure reconciles the list from the backend and then alerts
    /// once with the outcome.
    pub async fn delete_selected(&self) -> bool {
        let ids: Vec<String> = {
            let guard = self.inner.lock().expect("state poisoned");
            if guard.selected.is_empty() {
                return false;
            }
            guard.selected.iter().cloned().collect()
        };
        if !self
            .ui
            .confirm(&format!("Delete {} selected task(s)?", ids.len()))
        {
            return false;
        }

        // Reserve every id up front; refuse the bulk if any is already busy.
        {
            let mut guard = self.inner.lock().expect("state poisoned");
            if ids.iter().any(|id| guard.in_flight.contains(id)) {
                log::warn!("bulk delete ignored; a request is in flight for a selected task");
                return false;
            }
            for id in &ids {
                guard.in_flight.insert(id.clone());
            }
        }

        let results = join_all(ids.iter().map(|id| self.api.delete_task(id))).await;

        {
            let mut guard = self.inner.lock().expect("state poisoned");
            for id in &ids {
                guard.in_flight.remove(id);
            }
        }

        if results.iter().all(|r| r.is_ok()) {
            let mut guard = self.inner.lock().expect("state poisoned");
            guard.tasks.retain(|t| !ids.contains(&t.id));
            guard.selected.clear();
            return true;
        }

        let failed = results.iter().filter(|r| r.is_err()).count();
        log::warn!("bulk delete failed for {failed} of {} tasks", ids.len());

        // The requests are not transactional, so local assumptions are stale
        // now; re-fetch the authoritative list before reporting the outcome.
        match self.api.list_tasks().await {
            Ok(tasks) => {
                {
                    let mut guard = self.inner.lock().expect("state poisoned");
                    guard.selected.retain(|id| tasks.iter().any(|t| &t.id == id));
                    guard.tasks = dedupe_by_id(tasks);
                }
                self.ui.alert(BULK_DELETE_ERROR_ALERT);
            }
            Err(err) => {
                log::warn!("failed to reconcile after bulk delete: {err}");
                {
                    let mut guard = self.inner.lock().expect("state poisoned");
                    guard.load_error = Some(LOAD_ERROR_MESSAGE.to_string());
                }
                self.ui.alert(BULK_DELETE_STALE_ALERT);
            }
        }
        false
    }

    // ---- in-flight guard -------------------------------------------------

    fn begin_request(&self, task_id: &str) -> bool {
        let mut guard = self.inner.lock().expect("state poisoned");
        guard.in_flight.insert(task_id.to_string())
    }

    fn end_request(&self, task_id: &str) {
        let mut guard = self.inner.lock().expect("state poisoned");
        guard.in_flight.remove(task_id);
    }
}

fn dedupe_by_id(tasks: Vec<Task>) -> Vec<Task> {
    let mut seen = HashSet::new();
    let mut tasks = tasks;
    tasks.retain(|t| seen.insert(t.id.clone()));
    tasks
}
