use crate::api::TaskApi;
use crate::state::TaskBoard;
use dioxus::prelude::*;
use gloo_timers::future::TimeoutFuture;
use tasklist_core::{EditKey, EditOutcome, InlineEdit, Task, TaskId};

/// Matches the `slide` transition in main.css.
const SLIDE_DURATION_MS: u32 = 500;

/// One task with its complete, edit and delete controls.
#[component]
pub fn TaskRow(task: Task) -> Element {
    let api = use_context::<TaskApi>();
    let mut board = use_context::<TaskBoard>();
    let mut editing = use_signal(|| None::<InlineEdit>);
    let mut leaving = use_signal(|| false);

    let id = task.id;
    let completed = task.completed;

    let mut row_class = String::from("todo");
    if completed {
        row_class.push_str(" completed");
    }
    if leaving() {
        row_class.push_str(" slide");
    }

    let toggle_api = api.clone();
    let key_api = api.clone();
    let blur_api = api.clone();
    let delete_api = api;
    let original_text = task.text.clone();

    rsx! {
        div { class: "{row_class}", "data-id": "{id}",
            button {
                class: "complete-btn",
                onclick: move |_| {
                    let api = toggle_api.clone();
                    spawn(async move {
                        if let Err(e) = api.set_completed(id, !completed).await {
                            tracing::error!("Error updating task: {}", e);
                        }
                        board.refresh();
                    });
                },
                if completed {
                    i { class: "fa-solid fa-circle-check" }
                } else {
                    i { class: "fa-regular fa-circle" }
                }
            }
            if let Some(edit) = editing() {
                input {
                    class: "edit-input",
                    r#type: "text",
                    value: "{edit.draft()}",
                    placeholder: "{edit.original()}",
                    onmounted: move |evt: MountedEvent| async move {
                        if let Err(e) = evt.set_focus(true).await {
                            tracing::warn!("Could not focus edit box: {:?}", e);
                        }
                    },
                    oninput: move |evt| {
                        if let Some(edit) = editing.write().as_mut() {
                            edit.set_draft(evt.value());
                        }
                    },
                    onkeydown: move |evt: KeyboardEvent| {
                        let key = match evt.key() {
                            Key::Enter => EditKey::Enter,
                            Key::Escape => EditKey::Escape,
                            _ => EditKey::Other,
                        };
                        let outcome = editing.read().as_ref().map(|edit| edit.on_key(key));
                        if let Some(outcome) = outcome {
                            apply_edit(outcome, id, editing, key_api.clone(), board);
                        }
                    },
                    onblur: move |_| {
                        let outcome = editing.read().as_ref().map(InlineEdit::on_blur);
                        if let Some(outcome) = outcome {
                            apply_edit(outcome, id, editing, blur_api.clone(), board);
                        }
                    },
                }
            } else {
                li { class: "todo-item", "{task.text}" }
            }
            button {
                class: "edit-btn",
                disabled: completed,
                style: if completed { "opacity:0.5;" } else { "" },
                onclick: move |_| {
                    if !completed && editing.read().is_none() {
                        editing.set(Some(InlineEdit::new(original_text.clone())));
                    }
                },
                i { class: "fas fa-edit" }
            }
            button {
                class: "trash-btn",
                onclick: move |_| {
                    let api = delete_api.clone();
                    spawn(async move {
                        match api.delete(id).await {
                            Ok(()) => {
                                leaving.set(true);
                                TimeoutFuture::new(SLIDE_DURATION_MS).await;
                            }
                            Err(e) => tracing::error!("Error deleting task: {}", e),
                        }
                        board.refresh();
                    });
                },
                i { class: "fas fa-trash" }
            }
        }
    }
}

fn apply_edit(
    outcome: EditOutcome,
    id: TaskId,
    mut editing: Signal<Option<InlineEdit>>,
    api: TaskApi,
    mut board: TaskBoard,
) {
    match outcome {
        EditOutcome::Continue => {}
        EditOutcome::Revert => editing.set(None),
        EditOutcome::Commit(text) => {
            editing.set(None);
            spawn(async move {
                if let Err(e) = api.edit(id, &text).await {
                    tracing::error!("Error updating task: {}", e);
                }
                board.refresh();
            });
        }
    }
}
