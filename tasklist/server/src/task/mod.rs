use crate::entities::*;
use sea_orm::*;
use tasklist_core::{Task, TaskFilter, TaskId, TaskText, TaskTextError};
use uuid::Uuid;

pub mod api;

/// Error type for TaskService operations.
#[derive(Debug, thiserror::Error)]
pub enum TaskServiceError {
    /// The submitted task text was rejected.
    #[error(transparent)]
    Validation(#[from] TaskTextError),
    /// Represents a task not found error.
    #[error("Task with ID {0} not found")]
    TaskNotFound(TaskId),
    /// Represents a database error.
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

impl From<task::Model> for Task {
    fn from(model: task::Model) -> Self {
        Task::new(TaskId::from(model.id), model.text, model.completed)
    }
}

pub struct TaskService<'a> {
    db: &'a sea_orm::DatabaseConnection,
}

impl TaskService<'_> {
    pub fn new(db: &sea_orm::DatabaseConnection) -> TaskService<'_> {
        TaskService { db }
    }

    /// Retrieves the tasks passing `filter`, oldest first.
    #[tracing::instrument(skip(self))]
    pub async fn list_tasks(&self, filter: TaskFilter) -> Result<Vec<Task>, TaskServiceError> {
        let mut query = task::Entity::find();
        if let Some(completed) = filter.completed() {
            query = query.filter(task::Column::Completed.eq(completed));
        }
        let tasks = query
            .order_by_asc(task::Column::CreatedAt)
            .order_by_asc(task::Column::Id)
            .all(self.db)
            .await?
            .into_iter()
            .map(Task::from)
            .collect();
        Ok(tasks)
    }

    /// Creates a new, not yet completed task.
    ///
    /// # Arguments
    ///
    /// * `text` - The raw task text. It is trimmed and must not be empty.
    ///
    /// # Returns
    ///
    /// A `Result` containing the created `Task` with its assigned ID, or an error otherwise.
    #[tracing::instrument(skip(self))]
    pub async fn create_task(&self, text: &str) -> Result<Task, TaskServiceError> {
        let text = TaskText::parse(text)?;

        let active_model = task::ActiveModel {
            id: ActiveValue::Set(Uuid::new_v4()),
            text: ActiveValue::Set(text.into_inner()),
            completed: ActiveValue::Set(false),
            ..Default::default()
        };
        let created_model = active_model.insert(self.db).await?;
        Ok(Task::from(created_model))
    }

    /// Replaces the text of a task.
    ///
    /// # Arguments
    ///
    /// * `id` - The ID of the task to edit.
    /// * `text` - The new raw text. It is trimmed and must not be empty.
    ///
    /// # Returns
    ///
    /// A `Result` containing the updated `Task`, or an error otherwise.
    #[tracing::instrument(skip(self))]
    pub async fn edit_task_by_id(&self, id: TaskId, text: &str) -> Result<Task, TaskServiceError> {
        let task_to_update = self.find_model(id).await?;
        let text = TaskText::parse(text)?;

        let mut active_model: task::ActiveModel = task_to_update.into();
        active_model.text = ActiveValue::Set(text.into_inner());
        let updated_model = active_model.update(self.db).await?;

        Ok(Task::from(updated_model))
    }

    /// Flips the completion state of a task.
    #[tracing::instrument(skip(self))]
    pub async fn toggle_task_by_id(&self, id: TaskId) -> Result<Task, TaskServiceError> {
        let task_to_update = self.find_model(id).await?;
        let completed = !task_to_update.completed;
        self.save_completed(task_to_update, completed).await
    }

    /// Sets the completion state of a task. Repeating the call has no further effect.
    #[tracing::instrument(skip(self))]
    pub async fn set_task_completed(
        &self,
        id: TaskId,
        completed: bool,
    ) -> Result<Task, TaskServiceError> {
        let task_to_update = self.find_model(id).await?;
        self.save_completed(task_to_update, completed).await
    }

    /// Deletes a task by its ID.
    ///
    /// # Returns
    ///
    /// A `Result` containing `true` if a task was removed and `false` if there was
    /// no task with that ID, or an error otherwise.
    #[tracing::instrument(skip(self))]
    pub async fn delete_task_by_id(&self, id: TaskId) -> Result<bool, TaskServiceError> {
        let result = task::Entity::delete_by_id(id.as_uuid())
            .exec(self.db)
            .await?;
        Ok(result.rows_affected > 0)
    }

    async fn find_model(&self, id: TaskId) -> Result<task::Model, TaskServiceError> {
        task::Entity::find_by_id(id.as_uuid())
            .one(self.db)
            .await?
            .ok_or(TaskServiceError::TaskNotFound(id))
    }

    async fn save_completed(
        &self,
        model: task::Model,
        completed: bool,
    ) -> Result<Task, TaskServiceError> {
        let mut active_model: task::ActiveModel = model.into();
        active_model.completed = ActiveValue::Set(completed);
        let updated_model = active_model.update(self.db).await?;
        Ok(Task::from(updated_model))
    }
}
