use chrono::{DateTime, Utc};
use log::{debug, info};
use std::sync::Arc;

use crate::error::DomainError;
use crate::models::task::parse_task_id;
use crate::models::{NewTask, Task, TaskPatch, TaskStatus, TaskUpdate};
use crate::repository::{StoreError, TaskRepository};

/// Task lifecycle rules in front of the task store.
pub struct TaskUseCase {
    tasks: Arc<dyn TaskRepository>,
}

fn ensure_future(due_date: DateTime<Utc>) -> Result<(), DomainError> {
    if due_date <= Utc::now() {
        return Err(DomainError::InvalidDueDate);
    }
    Ok(())
}

fn task_not_found(error: StoreError) -> DomainError {
    match error {
        StoreError::NotFound => DomainError::TaskNotFound,
        other => other.into(),
    }
}

impl TaskUseCase {
    pub fn new(tasks: Arc<dyn TaskRepository>) -> Self {
        Self { tasks }
    }

    /// Validates and stores a new task. Status defaults to `pending`.
    pub async fn create_task(&self, input: NewTask) -> Result<Task, DomainError> {
        if input.title.is_empty() {
            return Err(DomainError::EmptyField("task title"));
        }
        if input.description.is_empty() {
            return Err(DomainError::EmptyField("task description"));
        }
        let due_date = input.due_date.ok_or(DomainError::EmptyField("due date"))?;
        let status = input
            .status
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| TaskStatus::Pending.as_str().to_string());

        ensure_future(due_date)?;
        let status: TaskStatus = status.parse()?;

        let task = self
            .tasks
            .create_task(Task::new(input.title, input.description, due_date, status))
            .await?;
        info!("Created task {} ({})", task.id, task.status);
        Ok(task)
    }

    /// Deletes a task after confirming it exists.
    pub async fn delete_task(&self, id: &str) -> Result<(), DomainError> {
        if id.is_empty() {
            return Err(DomainError::EmptyField("task ID"));
        }
        let id = parse_task_id(id)?;

        if self.tasks.find_by_id(id).await?.is_none() {
            return Err(DomainError::TaskNotFound);
        }

        self.tasks.delete_task(id).await.map_err(task_not_found)?;
        info!("Deleted task {}", id);
        Ok(())
    }

    /// Lists every task. An empty store yields an empty vector.
    pub async fn get_all_tasks(&self) -> Result<Vec<Task>, DomainError> {
        let tasks = self.tasks.find_all().await?;
        debug!("Listing {} tasks", tasks.len());
        Ok(tasks)
    }

    pub async fn get_task_by_id(&self, id: &str) -> Result<Task, DomainError> {
        if id.is_empty() {
            return Err(DomainError::EmptyField("task ID"));
        }
        let id = parse_task_id(id)?;

        self.tasks
            .find_by_id(id)
            .await?
            .ok_or(DomainError::TaskNotFound)
    }

    /// Applies a partial update. Only supplied, non-empty fields overwrite.
    pub async fn update_task(&self, id: &str, update: TaskUpdate) -> Result<Task, DomainError> {
        if id.is_empty() {
            return Err(DomainError::EmptyField("task ID"));
        }

        let update = update.normalized();
        if update.is_empty() {
            return Err(DomainError::NoFieldsProvided);
        }

        let status = match update.status {
            Some(raw) => Some(raw.parse::<TaskStatus>()?),
            None => None,
        };
        if let Some(due_date) = update.due_date {
            ensure_future(due_date)?;
        }

        let id = parse_task_id(id)?;
        let patch = TaskPatch {
            title: update.title,
            description: update.description,
            due_date: update.due_date,
            status,
        };

        let task = self
            .tasks
            .update_task(id, &patch)
            .await
            .map_err(task_not_found)?;
        info!("Updated task {}", task.id);
        Ok(task)
    }
}
