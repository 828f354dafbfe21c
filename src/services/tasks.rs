//! Task CRUD.

use std::sync::Arc;

use crate::config::OwnershipPolicy;
use crate::error::AppError;
use crate::models::{NewTask, PageRequest, Task, TaskChanges};
use crate::response::Pagination;
use crate::store::TaskStore;

#[derive(Clone)]
pub struct TaskService {
    store: Arc<dyn TaskStore>,
    ownership: OwnershipPolicy,
}

impl TaskService {
    pub fn new(store: Arc<dyn TaskStore>, ownership: OwnershipPolicy) -> Self {
        Self { store, ownership }
    }

    /// Returns one page of tasks, newest first, with pagination metadata.
    pub async fn list(&self, page: PageRequest) -> Result<(Vec<Task>, Pagination), AppError> {
        let total = self.store.count_tasks().await?;
        let tasks = self.store.list_tasks(page.limit(), page.offset()).await?;
        Ok((tasks, page.metadata(total)))
    }

    pub async fn get(&self, id: &str) -> Result<Task, AppError> {
        if id.is_empty() {
            return Err(AppError::invalid("validation error: id is required"));
        }
        self.store.find_task(id).await?.ok_or_else(not_found)
    }

    pub async fn create(&self, user_id: &str, changes: TaskChanges) -> Result<Task, AppError> {
        let task = self.store.insert_task(NewTask::new(user_id, changes)).await?;
        log::info!("User {} created task {}", user_id, task.id);
        Ok(task)
    }

    /// Overwrites title, description and label of task `id`.
    ///
    /// Under [`OwnershipPolicy::Owner`] a caller other than the creator gets
    /// `NotFound`, the same as for a missing task.
    pub async fn update(
        &self,
        caller_id: &str,
        id: &str,
        changes: TaskChanges,
    ) -> Result<Task, AppError> {
        let existing = self.get(id).await?;
        self.ensure_may_modify(caller_id, &existing)?;

        self.store
            .update_task(id, changes)
            .await?
            .ok_or_else(not_found)
    }

    pub async fn delete(&self, caller_id: &str, id: &str) -> Result<(), AppError> {
        if self.ownership == OwnershipPolicy::Owner {
            let existing = self.get(id).await?;
            self.ensure_may_modify(caller_id, &existing)?;
        }

        match self.store.delete_task(id).await? {
            0 => Err(not_found()),
            _ => {
                log::info!("User {} deleted task {}", caller_id, id);
                Ok(())
            }
        }
    }

    fn ensure_may_modify(&self, caller_id: &str, task: &Task) -> Result<(), AppError> {
        match self.ownership {
            OwnershipPolicy::Owner if task.user_id != caller_id => {
                log::warn!(
                    "User {} denied modification of task {} owned by {}",
                    caller_id,
                    task.id,
                    task.user_id
                );
                Err(not_found())
            }
            _ => Ok(()),
        }
    }
}

fn not_found() -> AppError {
    AppError::NotFound("task not found".into())
}
