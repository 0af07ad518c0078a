//! Report view frontend
//!
//! Binds the view toggle controller to the report page once it has loaded:
//! indexes the document, validates every dataset container against the
//! markup contract, and registers one listener per interactive element.
//!
//! The contract can be overridden by embedding TOML in the page:
//!
//! ```html
//! <script type="application/toml" id="report-view-config">
//! pane_match = "substring"
//! </script>
//! ```

mod web_dom;

pub use web_dom::WebDom;

use std::cell::RefCell;
use std::rc::Rc;

use report_view_core::{ContainerId, ContractConfig, Interaction, ViewToggleController, parse_contract};
use wasm_bindgen::prelude::*;
use web_sys::Document;

type SharedController = Rc<RefCell<ViewToggleController<WebDom>>>;

const CONFIG_ELEMENT_ID: &str = "report-view-config";

thread_local! {
    static CONTROLLER: RefCell<Option<SharedController>> = const { RefCell::new(None) };
}

#[wasm_bindgen(start)]
pub fn start() {
    let _ = dioxus_logger::init(tracing::Level::INFO);

    if let Err(err) = attach() {
        tracing::error!(?err, "report view not attached");
    }
}

fn attach() -> Result<(), JsValue> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let body = document
        .body()
        .ok_or_else(|| JsValue::from_str("document has no body"))?;

    let config = read_config(&document);
    let dom = WebDom::index(body.into());
    let controller = ViewToggleController::bind(dom, config)
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    let controller: SharedController = Rc::new(RefCell::new(controller));

    register_listeners(&controller)?;
    CONTROLLER.with(|slot| *slot.borrow_mut() = Some(controller));
    Ok(())
}

/// Contract from the embedded config element, or the stock contract
fn read_config(document: &Document) -> ContractConfig {
    let Some(text) = document
        .get_element_by_id(CONFIG_ELEMENT_ID)
        .and_then(|el| el.text_content())
    else {
        return ContractConfig::default();
    };

    match parse_contract(&text) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(%err, "invalid embedded contract, using defaults");
            ContractConfig::default()
        }
    }
}

fn register_listeners(controller: &SharedController) -> Result<(), JsValue> {
    let bindings = controller.borrow().bindings();
    for binding in &bindings {
        let Some(element) = controller.borrow().dom().element(binding.node).cloned() else {
            continue;
        };

        let ctl = Rc::clone(controller);
        let interaction = binding.interaction;
        let closure = Closure::<dyn FnMut(web_sys::Event)>::new(move |_: web_sys::Event| {
            // A handler re-entering through a synchronous DOM event is skipped
            let Ok(mut ctl) = ctl.try_borrow_mut() else {
                return;
            };
            if let Err(err) = ctl.dispatch(interaction) {
                tracing::warn!(%err, "interaction failed");
            }
        });

        element.add_event_listener_with_callback(
            binding.event.as_str(),
            closure.as_ref().unchecked_ref(),
        )?;
        // Listeners live as long as the page
        closure.forget();
    }

    tracing::info!(listeners = bindings.len(), "report view attached");
    Ok(())
}

fn with_controller<T>(
    f: impl FnOnce(&mut ViewToggleController<WebDom>) -> Result<T, JsValue>,
) -> Result<T, JsValue> {
    CONTROLLER.with(|slot| {
        let slot = slot.borrow();
        let controller = slot
            .as_ref()
            .ok_or_else(|| JsValue::from_str("report view not attached"))?;
        let mut controller = controller
            .try_borrow_mut()
            .map_err(|_| JsValue::from_str("report view busy"))?;
        f(&mut controller)
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// Page Script API
// ─────────────────────────────────────────────────────────────────────────────

/// Number of bound dataset containers
#[wasm_bindgen(js_name = "reportViewContainers")]
pub fn container_count() -> Result<usize, JsValue> {
    with_controller(|c| Ok(c.len()))
}

/// Current state of one dataset container as a plain JS object
#[wasm_bindgen(js_name = "reportViewSnapshot")]
pub fn snapshot(container: usize) -> Result<JsValue, JsValue> {
    with_controller(|c| {
        let snap = c
            .snapshot(ContainerId(container))
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        serde_wasm_bindgen::to_value(&snap).map_err(JsValue::from)
    })
}

/// Run an interaction, e.g. `{ kind: "show_info", container: 0 }`
#[wasm_bindgen(js_name = "reportViewDispatch")]
pub fn dispatch(interaction: JsValue) -> Result<(), JsValue> {
    let interaction: Interaction = serde_wasm_bindgen::from_value(interaction)?;
    with_controller(|c| {
        c.dispatch(interaction)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    })
}
