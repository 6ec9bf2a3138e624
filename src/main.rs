use yew::prelude::*;
use yew_router::prelude::*;
use log::{error, info};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{ErrorEvent, PromiseRejectionEvent};

mod animation;
mod config;
mod dom;
mod error;
mod submission;
mod timing;
mod toast;
mod validation;
mod view_state;
mod components {
    pub mod demo_modal;
    pub mod header;
    pub mod notification;
}
mod pages {
    pub mod landing;
}

use error::AppError;
use pages::landing::Landing;


#[derive(Clone, Routable, PartialEq)]
pub enum Route {
    #[at("/")]
    Home,
    #[not_found]
    #[at("/404")]
    NotFound,
}


fn switch(routes: Route) -> Html {
    match routes {
        Route::Home => {
            info!("Rendering landing page");
            html! { <Landing /> }
        },
        Route::NotFound => {
            info!("Unknown route, redirecting home");
            html! { <Redirect<Route> to={Route::Home} /> }
        },
    }
}


#[function_component]
fn App() -> Html {
    html! {
        <BrowserRouter>
            <Switch<Route> render={switch} />
        </BrowserRouter>
    }
}


/// Logs uncaught script errors and rejected promises instead of letting them
/// surface as broken page state.
fn install_global_error_handlers() -> Result<(), AppError> {
    let window = dom::window()?;

    let on_error = Closure::wrap(Box::new(|event: ErrorEvent| {
        error!(
            "JavaScript Error: {} ({}:{})",
            event.message(),
            event.filename(),
            event.lineno()
        );
    }) as Box<dyn FnMut(ErrorEvent)>);
    window.add_event_listener_with_callback("error", on_error.as_ref().unchecked_ref())?;
    on_error.forget();

    let on_rejection = Closure::wrap(Box::new(|event: PromiseRejectionEvent| {
        error!("Unhandled Promise Rejection: {:?}", event.reason());
    }) as Box<dyn FnMut(PromiseRejectionEvent)>);
    window.add_event_listener_with_callback(
        "unhandledrejection",
        on_rejection.as_ref().unchecked_ref(),
    )?;
    on_rejection.forget();

    Ok(())
}


fn main() {
    // Initialize console error panic hook for better error messages
    console_error_panic_hook::set_once();

    // Initialize logging
    console_log::init_with_level(config::log_level()).expect("error initializing log");

    error::isolate("global error handlers", install_global_error_handlers);

    info!("Starting application");
    yew::Renderer::<App>::new().render();
}
