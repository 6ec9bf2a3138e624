use std::rc::Rc;

use yew::functional::Reducible;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
    Info,
}

impl ToastKind {
    pub fn class(&self) -> &'static str {
        match self {
            ToastKind::Success => "notification-success",
            ToastKind::Error => "notification-error",
            ToastKind::Info => "notification-info",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub id: u32,
    pub message: String,
    pub kind: ToastKind,
    pub leaving: bool,
}

impl Toast {
    pub fn new(id: u32, message: impl Into<String>, kind: ToastKind) -> Self {
        Self { id, message: message.into(), kind, leaving: false }
    }
}

pub const TRIAL_ACTIVATED: &str =
    "🎉 Success! Your free trial has been activated. Check your email for next steps.";

pub const CHECKOUT_WITHOUT_EMAIL: &str =
    "ℹ️ Opening checkout without your email. The address entered looks incomplete.";

pub fn error_message(message: &str) -> String {
    format!("❌ {}", message)
}

pub enum ToastAction {
    Push(Toast),
    Leave(u32),
    Remove(u32),
}

/// Toasts currently on screen, oldest first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToastQueue {
    pub toasts: Vec<Toast>,
}

impl ToastQueue {
    pub fn push(&mut self, toast: Toast) {
        self.toasts.retain(|existing| existing.id != toast.id);
        self.toasts.push(toast);
    }

    pub fn mark_leaving(&mut self, id: u32) {
        if let Some(toast) = self.toasts.iter_mut().find(|toast| toast.id == id) {
            toast.leaving = true;
        }
    }

    pub fn remove(&mut self, id: u32) {
        self.toasts.retain(|toast| toast.id != id);
    }
}

impl Reducible for ToastQueue {
    type Action = ToastAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut queue = (*self).clone();
        match action {
            ToastAction::Push(toast) => queue.push(toast),
            ToastAction::Leave(id) => queue.mark_leaving(id),
            ToastAction::Remove(id) => queue.remove(id),
        }
        Rc::new(queue)
    }
}
