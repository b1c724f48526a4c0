use gloo::events::EventListener;
use wasm_bindgen::JsCast;
use web_sys::KeyboardEvent;
use yew::prelude::*;

/// Emit `on_escape` whenever Escape is pressed anywhere in the document
/// while the calling component is mounted.
#[hook]
pub fn use_escape_key(on_escape: Callback<()>) {
    use_effect_with(on_escape, |on_escape| {
        let on_escape = on_escape.clone();
        let listener = EventListener::new(&gloo::utils::document(), "keydown", move |event| {
            if event.dyn_ref::<KeyboardEvent>().is_some_and(is_escape) {
                on_escape.emit(());
            }
        });
        move || drop(listener)
    });
}

fn is_escape(event: &KeyboardEvent) -> bool {
    event.key() == "Escape"
}
