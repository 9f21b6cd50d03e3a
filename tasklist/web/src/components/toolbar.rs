use crate::api::TaskApi;
use crate::state::{TaskBoard, UsePersistent};
use dioxus::prelude::*;
use tasklist_core::TaskFilter;

/// Drop-down choosing which tasks are listed. The choice is remembered across reloads.
#[component]
pub fn FilterSelect() -> Element {
    let mut filter = use_context::<UsePersistent<TaskFilter>>();
    let current = filter.get();

    rsx! {
        div { class: "select",
            select {
                class: "filter-todo",
                name: "todos",
                onchange: move |evt| match evt.value().parse::<TaskFilter>() {
                    Ok(choice) => filter.set(choice),
                    Err(e) => tracing::warn!("{}", e),
                },
                for choice in TaskFilter::ALL {
                    option {
                        value: choice.as_str(),
                        selected: choice == current,
                        {choice.label()}
                    }
                }
            }
        }
    }
}

/// Pending-task counter, plus the clear-all button while any task exists.
#[component]
pub fn TaskSummary() -> Element {
    let api = use_context::<TaskApi>();
    let mut board = use_context::<TaskBoard>();
    let mut clearing = use_signal(|| false);

    let has_tasks = board.has_tasks();
    let pending = board
        .pending_count()
        .map(|count| count.to_string())
        .unwrap_or_else(|| "-".to_string());

    rsx! {
        div { class: "todo-summary",
            p {
                "You have "
                span { class: "pendingTasks", "{pending}" }
                " pending tasks"
            }
            if has_tasks {
                button {
                    class: "clear-all active",
                    disabled: clearing(),
                    onclick: move |_| {
                        if clearing() {
                            return;
                        }
                        clearing.set(true);
                        let api = api.clone();
                        spawn(async move {
                            match api.delete_all().await {
                                Ok(count) => tracing::info!("Cleared {} tasks", count),
                                Err(e) => tracing::error!("Error clearing tasks: {}", e),
                            }
                            clearing.set(false);
                            board.refresh();
                        });
                    },
                    "Clear All"
                }
            }
        }
    }
}
