use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::{StoreError, StoreResult, TaskStore, UserStore, USERS_EMAIL_KEY};
use crate::models::{NewTask, NewUser, Task, TaskChanges, User};

#[derive(Default)]
struct State {
    users: HashMap<String, User>,
    /// email -> user id, the in-memory unique index.
    emails: HashMap<String, String>,
    /// id -> (insertion sequence, task)
    tasks: HashMap<String, (u64, Task)>,
    next_seq: u64,
}

/// In-memory implementation of both store ports.
///
/// Each operation holds the lock for its whole duration, so the email
/// uniqueness check and the insert are atomic.
#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<RwLock<State>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn insert_user(&self, user: NewUser) -> StoreResult<User> {
        let mut state = self.state.write().await;
        if state.emails.contains_key(&user.email) {
            return Err(StoreError::UniqueViolation {
                constraint: USERS_EMAIL_KEY.into(),
            });
        }
        if state.users.contains_key(&user.id) {
            return Err(StoreError::UniqueViolation {
                constraint: "users_pkey".into(),
            });
        }

        let now = Utc::now();
        let stored = User {
            id: user.id,
            created_at: now,
            updated_at: now,
            email: user.email,
            password_hash: user.password_hash,
            name: user.name,
        };
        state.emails.insert(stored.email.clone(), stored.id.clone());
        state.users.insert(stored.id.clone(), stored.clone());
        Ok(stored)
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let state = self.state.read().await;
        Ok(state
            .emails
            .get(email)
            .and_then(|id| state.users.get(id))
            .cloned())
    }

    async fn find_user_by_id(&self, id: &str) -> StoreResult<Option<User>> {
        Ok(self.state.read().await.users.get(id).cloned())
    }
}

#[async_trait]
impl TaskStore for MemoryStore {
    async fn count_tasks(&self) -> StoreResult<i64> {
        Ok(self.state.read().await.tasks.len() as i64)
    }

    async fn list_tasks(&self, limit: i64, offset: i64) -> StoreResult<Vec<Task>> {
        let state = self.state.read().await;
        let mut rows: Vec<&(u64, Task)> = state.tasks.values().collect();
        rows.sort_by(|(a_seq, a), (b_seq, b)| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b_seq.cmp(a_seq))
        });

        let offset = usize::try_from(offset.max(0)).unwrap_or(usize::MAX);
        let limit = usize::try_from(limit.max(0)).unwrap_or(usize::MAX);
        Ok(rows
            .into_iter()
            .skip(offset)
            .take(limit)
            .map(|(_, task)| task.clone())
            .collect())
    }

    async fn find_task(&self, id: &str) -> StoreResult<Option<Task>> {
        Ok(self
            .state
            .read()
            .await
            .tasks
            .get(id)
            .map(|(_, task)| task.clone()))
    }

    async fn insert_task(&self, task: NewTask) -> StoreResult<Task> {
        let mut state = self.state.write().await;
        if state.tasks.contains_key(&task.id) {
            return Err(StoreError::UniqueViolation {
                constraint: "tasks_pkey".into(),
            });
        }

        let now = Utc::now();
        let stored = Task {
            id: task.id,
            created_at: now,
            updated_at: now,
            user_id: task.user_id,
            title: task.title,
            desc: task.desc,
            label: task.label,
        };
        let seq = state.next_seq;
        state.next_seq += 1;
        state.tasks.insert(stored.id.clone(), (seq, stored.clone()));
        Ok(stored)
    }

    async fn update_task(&self, id: &str, changes: TaskChanges) -> StoreResult<Option<Task>> {
        let mut state = self.state.write().await;
        let Some((_, task)) = state.tasks.get_mut(id) else {
            return Ok(None);
        };
        task.title = changes.title;
        task.desc = changes.desc;
        task.label = changes.label;
        task.updated_at = Utc::now();
        Ok(Some(task.clone()))
    }

    async fn delete_task(&self, id: &str) -> StoreResult<u64> {
        let removed = self.state.write().await.tasks.remove(id);
        Ok(u64::from(removed.is_some()))
    }
}
