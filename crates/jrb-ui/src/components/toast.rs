use leptos::prelude::*;

const TOAST_LIFETIME: std::time::Duration = std::time::Duration::from_secs(4);

#[derive(Clone, Debug, PartialEq)]
pub enum ToastLevel {
    Success,
    Error,
}

#[derive(Clone, Debug)]
pub struct Toast {
    pub id: u64,
    pub message: String,
    pub level: ToastLevel,
}

/// Handle for raising short-lived notices from any page.
#[derive(Clone, Copy)]
pub struct ToastContext {
    toasts: RwSignal<Vec<Toast>>,
    nextId: RwSignal<u64>,
}

impl ToastContext {
    pub fn success(&self, message: impl Into<String>) {
        self.push(message.into(), ToastLevel::Success);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.push(message.into(), ToastLevel::Error);
    }

    fn push(&self, message: String, level: ToastLevel) {
        let id = self.nextId.get_untracked();
        self.nextId.set(id + 1);
        self.toasts.update(|toasts| toasts.push(Toast { id, message, level }));

        let toasts = self.toasts;
        set_timeout(
            move || toasts.update(|list| list.retain(|t| t.id != id)),
            TOAST_LIFETIME,
        );
    }
}

fn toast_class(level: &ToastLevel) -> &'static str {
    match level {
        ToastLevel::Success => "toast toast-success",
        ToastLevel::Error => "toast toast-error",
    }
}

/// Provides [`ToastContext`] to its children and renders the stack.
#[component]
pub fn ToastProvider(children: Children) -> impl IntoView {
    let ctx = ToastContext {
        toasts: RwSignal::new(Vec::new()),
        nextId: RwSignal::new(0),
    };
    provide_context(ctx);

    view! {
        {children()}
        <div class="toast-container">
            <For each=move || ctx.toasts.get() key=|toast| toast.id let:toast>
                <div class=toast_class(&toast.level)>{toast.message.clone()}</div>
            </For>
        </div>
    }
}
