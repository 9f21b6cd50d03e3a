use dioxus::prelude::*;

/// Inline error banner for failed requests
#[component]
pub fn ErrorMessage(message: String) -> Element {
    rsx! {
        div { class: "error-message",
            p { "{message}" }
        }
    }
}
