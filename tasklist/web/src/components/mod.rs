mod add_task;
mod error_message;
mod task_list;
mod task_row;
mod toolbar;

pub use add_task::AddTaskForm;
pub use error_message::ErrorMessage;
pub use task_list::TaskList;
pub use task_row::TaskRow;
pub use toolbar::{FilterSelect, TaskSummary};
