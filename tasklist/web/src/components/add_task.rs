use crate::api::TaskApi;
use crate::state::TaskBoard;
use dioxus::prelude::*;
use tasklist_core::TaskText;

/// Text box and button for adding a task. Blank input is ignored.
#[component]
pub fn AddTaskForm() -> Element {
    let api = use_context::<TaskApi>();
    let mut board = use_context::<TaskBoard>();
    let mut draft = use_signal(String::new);

    let has_text = !draft.read().trim().is_empty();

    rsx! {
        form {
            class: "todo-form",
            onsubmit: move |evt: FormEvent| {
                evt.prevent_default();
                let Ok(text) = TaskText::parse(&draft.read()) else {
                    return;
                };
                draft.set(String::new());
                let api = api.clone();
                spawn(async move {
                    match api.create(&text).await {
                        Ok(task) => tracing::debug!("Added task {}", task.id),
                        Err(e) => tracing::error!("Error adding task: {}", e),
                    }
                    board.refresh();
                });
            },
            input {
                class: "todo-input",
                r#type: "text",
                placeholder: "Add a new task",
                value: "{draft}",
                oninput: move |evt| draft.set(evt.value()),
            }
            button {
                class: if has_text { "todo-add-new-task-button active" } else { "todo-add-new-task-button" },
                r#type: "submit",
                i { class: "fas fa-plus" }
            }
        }
    }
}
