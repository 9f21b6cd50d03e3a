mod api;
mod components;
mod state;

use crate::api::TaskApi;
use crate::components::*;
use crate::state::{use_filter_preference, use_task_board};
use dioxus::prelude::*;

static CSS: Asset = asset!("/assets/main.css");
const FONT_AWESOME: &str =
    "https://cdnjs.cloudflare.com/ajax/libs/font-awesome/6.5.1/css/all.min.css";

fn main() {
    dioxus::launch(App);
}

#[component]
fn App() -> Element {
    let api = use_context_provider(TaskApi::from_build_env);
    let filter = use_filter_preference();
    use_context_provider(|| filter);
    use_task_board(api, filter);

    rsx! {
        document::Link { rel: "stylesheet", href: FONT_AWESOME }
        document::Stylesheet { href: CSS }
        header {
            h1 { "Task List" }
        }
        AddTaskForm {}
        div { class: "todo-toolbar",
            FilterSelect {}
            TaskSummary {}
        }
        TaskList {}
    }
}
