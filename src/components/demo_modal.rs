use std::collections::BTreeMap;

use gloo_timers::callback::Timeout;
use log::{debug, error};
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Element, HtmlInputElement, KeyboardEvent};
use yew::prelude::*;
use yew_hooks::prelude::use_event_with_window;

use crate::config::{FIRST_INPUT_FOCUS_DELAY_MS, MODAL_FADE_MS};
use crate::dom;
use crate::submission::{checkout_url, submit_trial_request, TrialRequest};
use crate::toast::{error_message, ToastKind, CHECKOUT_WITHOUT_EMAIL, TRIAL_ACTIVATED};
use crate::validation::{trial_form_rules, validate_field, validate_form, FieldValidationResult};

const FIELDS: [&str; 3] = ["name", "email", "company"];

#[derive(Clone, Default, PartialEq)]
struct TrialForm {
    name: String,
    email: String,
    company: String,
}

impl TrialForm {
    fn value(&self, field: &str) -> &str {
        match field {
            "name" => &self.name,
            "email" => &self.email,
            "company" => &self.company,
            _ => "",
        }
    }

    fn with_value(&self, field: &str, value: String) -> Self {
        let mut next = self.clone();
        match field {
            "name" => next.name = value,
            "email" => next.email = value,
            "company" => next.company = value,
            _ => {}
        }
        next
    }

    fn fields(&self) -> [(&str, &str); 3] {
        FIELDS.map(|field| (field, self.value(field)))
    }
}

/// Counts open and close transitions so a late submission can tell whether
/// the modal it started in is still the one on screen.
#[derive(Debug, Default)]
struct ModalSession(u32);

impl ModalSession {
    fn advance(&mut self) -> u32 {
        self.0 = self.0.wrapping_add(1);
        self.0
    }

    fn current(&self) -> u32 {
        self.0
    }

    fn is_current(&self, ticket: u32) -> bool {
        self.0 == ticket
    }
}

#[derive(Debug, PartialEq, Eq)]
enum CheckoutPrefill<'a> {
    Email(&'a str),
    Empty,
    /// Something was typed but it is not an address we can hand over.
    Rejected,
}

fn checkout_prefill(email: &str) -> CheckoutPrefill<'_> {
    if email.trim().is_empty() {
        CheckoutPrefill::Empty
    } else if validate_field("email", email, trial_form_rules()).valid {
        CheckoutPrefill::Email(email)
    } else {
        CheckoutPrefill::Rejected
    }
}

#[derive(Properties, PartialEq)]
pub struct DemoModalProps {
    pub open: bool,
    pub on_close: Callback<()>,
    pub on_notify: Callback<(String, ToastKind)>,
}

#[function_component(DemoModal)]
pub fn demo_modal(props: &DemoModalProps) -> Html {
    let form = use_state(TrialForm::default);
    // Absent means the field has not been checked since it last changed.
    let checks = use_state(BTreeMap::<&'static str, FieldValidationResult>::new);
    let submitting = use_state(|| false);
    let closing = use_state(|| false);
    let overlay_ref = use_node_ref();
    let first_input_ref = use_node_ref();
    let session = use_mut_ref(ModalSession::default);

    let request_close = {
        let closing = closing.clone();
        let session = session.clone();
        let on_close = props.on_close.clone();
        Callback::from(move |_: ()| {
            if *closing {
                return;
            }
            session.borrow_mut().advance();
            closing.set(true);
            let closing = closing.clone();
            let on_close = on_close.clone();
            Timeout::new(MODAL_FADE_MS, move || {
                closing.set(false);
                on_close.emit(());
            })
            .forget();
        })
    };

    // Focus the first field once the open animation has started.
    {
        let first_input_ref = first_input_ref.clone();
        let session = session.clone();
        use_effect_with_deps(
            move |open| {
                if *open {
                    session.borrow_mut().advance();
                    Timeout::new(FIRST_INPUT_FOCUS_DELAY_MS, move || {
                        if let Some(input) = first_input_ref.cast::<HtmlInputElement>() {
                            let _ = input.focus();
                        }
                    })
                    .forget();
                }
                || ()
            },
            props.open,
        );
    }

    {
        let open = props.open;
        let request_close = request_close.clone();
        use_event_with_window("keydown", move |e: KeyboardEvent| {
            if open && e.key() == "Escape" {
                request_close.emit(());
            }
        });
    }

    let on_backdrop_click = {
        let overlay_ref = overlay_ref.clone();
        let request_close = request_close.clone();
        Callback::from(move |e: MouseEvent| {
            let clicked = e.target().and_then(|target| target.dyn_into::<Element>().ok());
            if clicked.is_some() && clicked == overlay_ref.cast::<Element>() {
                request_close.emit(());
            }
        })
    };

    let on_close_click = {
        let request_close = request_close.clone();
        Callback::from(move |_: MouseEvent| request_close.emit(()))
    };

    let on_input = |field: &'static str| {
        let form = form.clone();
        let checks = checks.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            form.set(form.with_value(field, input.value()));
            if checks.contains_key(field) {
                let mut next = (*checks).clone();
                next.remove(field);
                checks.set(next);
            }
        })
    };

    let on_blur = |field: &'static str| {
        let checks = checks.clone();
        Callback::from(move |e: FocusEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            let mut next = (*checks).clone();
            next.insert(field, validate_field(field, &input.value(), trial_form_rules()));
            checks.set(next);
        })
    };

    let on_submit = {
        let form = form.clone();
        let checks = checks.clone();
        let submitting = submitting.clone();
        let on_notify = props.on_notify.clone();
        let request_close = request_close.clone();
        let session = session.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            if *submitting {
                return;
            }
            let outcome = validate_form(form.fields(), trial_form_rules());
            let mut next = BTreeMap::new();
            for field in FIELDS {
                if let Some(result) = outcome.fields.get(field) {
                    next.insert(field, result.clone());
                }
            }
            checks.set(next);
            if !outcome.is_valid() {
                for field in FIELDS {
                    if let Some(message) = outcome.error_for(field) {
                        debug!("Trial form {} rejected: {}", field, message);
                    }
                }
                return;
            }

            let request = TrialRequest::from_form(&form.name, &form.email, &form.company);
            let form = form.clone();
            let checks = checks.clone();
            let submitting = submitting.clone();
            let on_notify = on_notify.clone();
            let request_close = request_close.clone();
            let session = session.clone();
            let ticket = session.borrow().current();
            submitting.set(true);
            spawn_local(async move {
                match submit_trial_request(request).await {
                    Ok(_) => {
                        on_notify.emit((TRIAL_ACTIVATED.to_string(), ToastKind::Success));
                        form.set(TrialForm::default());
                        checks.set(BTreeMap::new());
                        // Closed or reopened while waiting: leave it alone.
                        if session.borrow().is_current(ticket) {
                            request_close.emit(());
                        }
                    }
                    Err(e) => {
                        error!("Form submission error: {}", e);
                        on_notify.emit((
                            error_message("Something went wrong. Please try again."),
                            ToastKind::Error,
                        ));
                    }
                }
                submitting.set(false);
            });
        })
    };

    let on_checkout = {
        let form = form.clone();
        let on_notify = props.on_notify.clone();
        Callback::from(move |e: MouseEvent| {
            e.prevent_default();
            let prefilled = match checkout_prefill(&form.email) {
                CheckoutPrefill::Email(email) => Some(email),
                CheckoutPrefill::Empty => None,
                CheckoutPrefill::Rejected => {
                    on_notify.emit((CHECKOUT_WITHOUT_EMAIL.to_string(), ToastKind::Info));
                    None
                }
            };
            let url = checkout_url(prefilled);
            if let Err(e) = dom::open_external(&url) {
                error!("Failed to open checkout: {}", e);
            }
        })
    };

    if !props.open {
        return html! {};
    }

    let field = |name: &'static str, label: &'static str, input_type: &'static str, node_ref: NodeRef| {
        let check = checks.get(name);
        let state_class = check.map(|check| if check.valid { "valid" } else { "invalid" });
        let message = check.and_then(|check| check.error_message.clone());
        html! {
            <div class="form-group">
                <label for={format!("trial-{}", name)}>{label}</label>
                <input
                    ref={node_ref}
                    id={format!("trial-{}", name)}
                    class={classes!("form-input", state_class)}
                    type={input_type}
                    name={name}
                    value={form.value(name).to_string()}
                    oninput={on_input(name)}
                    onblur={on_blur(name)}
                />
                if let Some(message) = message {
                    <div class="field-error">{message}</div>
                }
            </div>
        }
    };

    html! {
        <div
            id="demo-modal"
            class={classes!("modal-overlay", (*closing).then(|| "closing"))}
            ref={overlay_ref}
            onclick={on_backdrop_click}
        >
            <style>
                {r#"
                    .modal-overlay {
                        position: fixed;
                        inset: 0;
                        display: flex;
                        align-items: center;
                        justify-content: center;
                        background: rgba(15, 23, 42, 0.6);
                        z-index: 10000;
                        padding: 1rem;
                    }
                    .modal {
                        position: relative;
                        background: white;
                        border-radius: 1rem;
                        padding: 2.5rem;
                        width: 100%;
                        max-width: 460px;
                        animation: modalFadeIn 0.3s ease-out;
                    }
                    .modal-overlay.closing .modal {
                        animation: modalFadeOut 0.3s ease-out forwards;
                    }
                    .modal-close {
                        position: absolute;
                        top: 1rem;
                        right: 1rem;
                        background: none;
                        border: none;
                        font-size: 1.5rem;
                        cursor: pointer;
                        color: #64748b;
                    }
                    .form-group {
                        display: flex;
                        flex-direction: column;
                        margin-bottom: 1rem;
                    }
                    .form-input {
                        padding: 0.75rem 1rem;
                        border: 1px solid #cbd5e1;
                        border-radius: 0.5rem;
                        font-size: 1rem;
                    }
                    .form-input.invalid {
                        border-color: #ef4444;
                        background-color: #fef2f2;
                    }
                    .form-input.valid {
                        border-color: #10b981;
                        background-color: #f0fdf4;
                    }
                    .field-error {
                        color: #ef4444;
                        font-size: 0.875rem;
                        margin-top: 0.25rem;
                    }
                    .modal-submit {
                        width: 100%;
                        padding: 0.9rem;
                        border: none;
                        border-radius: 0.5rem;
                        background: linear-gradient(135deg, #6366f1, #8b5cf6);
                        color: white;
                        font-weight: 600;
                        cursor: pointer;
                    }
                    .modal-submit:disabled {
                        opacity: 0.7;
                        cursor: wait;
                    }
                    .modal-checkout {
                        display: block;
                        margin-top: 1rem;
                        text-align: center;
                        color: #6366f1;
                    }
                    @keyframes modalFadeIn {
                        from { opacity: 0; transform: scale(0.9); }
                        to { opacity: 1; transform: scale(1); }
                    }
                    @keyframes modalFadeOut {
                        from { opacity: 1; transform: scale(1); }
                        to { opacity: 0; transform: scale(0.9); }
                    }
                "#}
            </style>
            <div class="modal" role="dialog" aria-modal="true" aria-labelledby="demo-modal-title">
                <button id="close-modal" class="modal-close" aria-label="Close" onclick={on_close_click}>{"✕"}</button>
                <h2 id="demo-modal-title">{"Start your free trial"}</h2>
                <p>{"14 days, every feature, no credit card."}</p>
                <form id="demo-form" novalidate={true} onsubmit={on_submit}>
                    { field("name", "Full name", "text", first_input_ref.clone()) }
                    { field("email", "Work email", "email", NodeRef::default()) }
                    { field("company", "Company (optional)", "text", NodeRef::default()) }
                    <button type="submit" class="modal-submit" disabled={*submitting}>
                        { if *submitting { "Processing..." } else { "Start Free Trial" } }
                    </button>
                </form>
                <a href="#demo" class="modal-checkout" onclick={on_checkout}>
                    {"Skip ahead to checkout →"}
                </a>
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn submission_ticket_survives_while_modal_stays_open() {
        let mut session = ModalSession::default();
        session.advance();
        let ticket = session.current();
        assert!(session.is_current(ticket));
    }

    #[test]
    fn closing_or_reopening_invalidates_a_pending_ticket() {
        let mut session = ModalSession::default();
        session.advance();
        let ticket = session.current();

        session.advance();
        assert!(!session.is_current(ticket));

        let reopened = session.advance();
        assert!(!session.is_current(ticket));
        assert!(session.is_current(reopened));
    }

    #[test]
    fn checkout_only_prefills_valid_addresses() {
        assert_eq!(checkout_prefill("ada@example.com"), CheckoutPrefill::Email("ada@example.com"));
        assert_eq!(checkout_prefill("   "), CheckoutPrefill::Empty);
        assert_eq!(checkout_prefill("ada@"), CheckoutPrefill::Rejected);
    }

    #[test]
    fn form_fields_follow_the_rule_order() {
        let form = TrialForm::default()
            .with_value("name", "Ada".into())
            .with_value("company", "Engines".into());
        assert_eq!(form.fields(), [("name", "Ada"), ("email", ""), ("company", "Engines")]);
        assert_eq!(form.value("phone"), "");
    }
}
