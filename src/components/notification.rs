use std::rc::Rc;

use gloo_timers::callback::Timeout;
use yew::prelude::*;

use crate::config::{TOAST_EXIT_MS, TOAST_LIFETIME_MS};
use crate::toast::{Toast, ToastAction, ToastKind, ToastQueue};

pub struct Notifications {
    pub queue: UseReducerHandle<ToastQueue>,
    pub notify: Callback<(String, ToastKind)>,
}

/// Toast state plus a callback that shows one and schedules its exit:
/// visible for five seconds, then a short slide-out before removal.
#[hook]
pub fn use_notifications() -> Notifications {
    let queue = use_reducer(ToastQueue::default);
    let next_id = use_mut_ref(|| 0u32);

    let notify = {
        let dispatcher = queue.dispatcher();
        let next_id = Rc::clone(&next_id);
        Callback::from(move |(message, kind): (String, ToastKind)| {
            let id = {
                let mut counter = next_id.borrow_mut();
                let id = *counter;
                *counter = id.wrapping_add(1);
                id
            };
            dispatcher.dispatch(ToastAction::Push(Toast::new(id, message, kind)));

            let dispatcher = dispatcher.clone();
            let timeout = Timeout::new(TOAST_LIFETIME_MS, move || {
                dispatcher.dispatch(ToastAction::Leave(id));
                let exit = Timeout::new(TOAST_EXIT_MS, move || {
                    dispatcher.dispatch(ToastAction::Remove(id));
                });
                exit.forget();
            });
            timeout.forget();
        })
    };

    Notifications { queue, notify }
}

#[derive(Properties, PartialEq)]
pub struct ToastStackProps {
    pub toasts: Vec<Toast>,
}

#[function_component(ToastStack)]
pub fn toast_stack(props: &ToastStackProps) -> Html {
    html! {
        <div class="notification-stack" role="status" aria-live="polite">
            <style>
                {r#"
                    .notification-stack {
                        position: fixed;
                        top: 20px;
                        right: 20px;
                        z-index: 10001;
                        display: flex;
                        flex-direction: column;
                        gap: 0.75rem;
                    }
                    .notification {
                        color: white;
                        padding: 1rem 1.5rem;
                        border-radius: 0.5rem;
                        box-shadow: 0 10px 15px -3px rgba(0, 0, 0, 0.1);
                        max-width: 400px;
                        animation: slideInFromRight 0.3s ease-out;
                    }
                    .notification-success { background: #10b981; }
                    .notification-error { background: #ef4444; }
                    .notification-info { background: #3b82f6; }
                    .notification.leaving {
                        animation: slideOutToRight 0.3s ease-out forwards;
                    }
                    @keyframes slideInFromRight {
                        from { opacity: 0; transform: translateX(100%); }
                        to { opacity: 1; transform: translateX(0); }
                    }
                    @keyframes slideOutToRight {
                        from { opacity: 1; transform: translateX(0); }
                        to { opacity: 0; transform: translateX(100%); }
                    }
                "#}
            </style>
            { for props.toasts.iter().map(|toast| html! {
                <div
                    key={toast.id}
                    class={classes!("notification", toast.kind.class(), toast.leaving.then(|| "leaving"))}
                >
                    { toast.message.clone() }
                </div>
            }) }
        </div>
    }
}
