use crate::components::{ErrorMessage, TaskRow};
use crate::state::{TaskBoard, UsePersistent};
use dioxus::prelude::*;
use tasklist_core::TaskFilter;

#[component]
pub fn TaskList() -> Element {
    let board = use_context::<TaskBoard>();
    let filter = use_context::<UsePersistent<TaskFilter>>().get();

    match &*board.listed.read_unchecked() {
        None => rsx! {
            p { class: "todo-status", "Loading tasks..." }
        },
        Some(Err(e)) => rsx! {
            ErrorMessage { message: format!("Error fetching tasks: {e}") }
        },
        Some(Ok(tasks)) => rsx! {
            ul { class: "todo-list",
                // Rows from the previous filter stay hidden until the new listing arrives.
                for task in tasks.iter().filter(|task| filter.matches(task)) {
                    TaskRow { key: "{task.id}", task: task.clone() }
                }
            }
        },
    }
}
