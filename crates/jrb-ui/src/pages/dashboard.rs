use jrb_client::{ListState, PositionDraft};
use jrb_types::Position;
use leptos::ev::SubmitEvent;
use leptos::prelude::*;

use crate::components::toast::ToastContext;

/// Everything the dashboard can ask for.
#[derive(Clone, Debug)]
enum Action {
    Refresh,
    Save(PositionDraft),
    Edit(Position),
    CancelEdit,
    Delete(i64),
    Logout,
}

#[component]
pub fn DashboardPage() -> impl IntoView {
    #[allow(unused_variables)]
    let (listState, setListState) = signal(ListState::Idle);
    let (draft, setDraft) = signal(PositionDraft::default());
    #[allow(unused_variables)]
    let (error, setError) = signal(Option::<String>::None);
    #[allow(unused_variables)]
    let (expiresAt, setExpiresAt) = signal(Option::<String>::None);
    #[allow(unused_variables)]
    let toasts = use_context::<ToastContext>();

    #[cfg(feature = "hydrate")]
    let controller = match crate::browser::Backend::connect() {
        Ok(backend) => {
            Some(backend.positions().on_change(move |state| setListState.set(state)))
        }
        Err(e) => {
            setError.set(Some(e));
            None
        }
    };
    #[cfg(feature = "hydrate")]
    {
        if let Some(c) = controller.as_ref() {
            setExpiresAt.set(c.session().expires_at());
        }
    }

    let dispatch = move |action: Action| {
        // Form-only actions never touch the API.
        match &action {
            Action::Edit(position) => {
                setDraft.set(PositionDraft::edit(position));
                return;
            }
            Action::CancelEdit => {
                setDraft.set(PositionDraft::default());
                return;
            }
            _ => {}
        }

        #[cfg(feature = "hydrate")]
        {
            use jrb_client::Outcome;
            use wasm_bindgen_futures::spawn_local;

            let Some(controller) = controller.clone() else {
                return;
            };
            if matches!(action, Action::Save(_) | Action::Delete(_)) {
                setError.set(None);
            }

            spawn_local(async move {
                let outcome = match &action {
                    Action::Refresh => controller.list().await,
                    Action::Save(d) => controller.save(d).await,
                    Action::Delete(id) => controller.delete(*id).await,
                    Action::Logout => {
                        controller.session().sign_out();
                        Outcome::SignedOut
                    }
                    Action::Edit(_) | Action::CancelEdit => Outcome::Done,
                };

                match (outcome, action) {
                    (Outcome::Done, Action::Save(saved)) => {
                        setDraft.set(PositionDraft::default());
                        if let Some(t) = toasts {
                            t.success(if saved.is_editing() {
                                "Position updated"
                            } else {
                                "Position created"
                            });
                        }
                    }
                    (Outcome::Done, Action::Delete(_)) => {
                        if let Some(t) = toasts {
                            t.success("Position deleted");
                        }
                    }
                    // Refresh failures already show in the list itself.
                    (Outcome::Failed(message), Action::Save(_) | Action::Delete(_)) => {
                        setError.set(Some(message));
                    }
                    _ => {}
                }
            });
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = action;
        }
    };

    #[cfg(feature = "hydrate")]
    {
        if let (Some(t), Some(message)) = (toasts, error.get_untracked()) {
            t.error(message);
        }
        // An absent token takes the sign-out path straight away.
        dispatch(Action::Refresh);
    }

    let handleSubmit = {
        let dispatch = dispatch.clone();
        move |ev: SubmitEvent| {
            ev.prevent_default();
            dispatch(Action::Save(draft.get_untracked()));
        }
    };

    view! {
        <header class="dashboard-header">
            <div>
                <h1>"Positions Dashboard"</h1>
                {move || {
                    expiresAt
                        .get()
                        .map(|at| view! { <p class="subtitle">"Session expires " {at}</p> })
                }}
            </div>
            <div class="header-actions">
                <button
                    class="btn btn-primary"
                    on:click={
                        let dispatch = dispatch.clone();
                        move |_| dispatch(Action::Refresh)
                    }
                >
                    "Refresh"
                </button>
                <button
                    class="btn btn-danger"
                    on:click={
                        let dispatch = dispatch.clone();
                        move |_| dispatch(Action::Logout)
                    }
                >
                    "Logout"
                </button>
            </div>
        </header>

        <section class="card">
            <h2 class="card-title">{move || draft.get().title()}</h2>
            <form class="position-form" on:submit=handleSubmit>
                <input
                    placeholder="Position Code"
                    required
                    prop:value=move || draft.get().code
                    on:input=move |ev| setDraft.update(|d| d.code = event_target_value(&ev))
                />
                <input
                    placeholder="Position Name"
                    required
                    prop:value=move || draft.get().name
                    on:input=move |ev| setDraft.update(|d| d.name = event_target_value(&ev))
                />
                <div class="form-actions">
                    <button type="submit" class="btn btn-primary">
                        {move || draft.get().submit_label()}
                    </button>
                    {
                        let dispatch = dispatch.clone();
                        move || {
                            let dispatch = dispatch.clone();
                            draft
                                .get()
                                .is_editing()
                                .then(|| {
                                    view! {
                                        <button
                                            type="button"
                                            class="btn btn-ghost"
                                            on:click=move |_| dispatch(Action::CancelEdit)
                                        >
                                            "Cancel"
                                        </button>
                                    }
                                })
                        }
                    }
                </div>
            </form>
            {move || error.get().map(|message| view! { <p class="form-error">{message}</p> })}
        </section>

        <section>
            <h2>"Positions List"</h2>
            {move || {
                let dispatch = dispatch.clone();
                match listState.get() {
                    ListState::Idle | ListState::Loading => {
                        view! {
                            <div class="loading">
                                <div class="spinner"></div>
                                "Loading positions..."
                            </div>
                        }
                            .into_any()
                    }
                    ListState::Failed(message) => {
                        view! {
                            <div class="card">
                                <p class="login-error">{message}</p>
                            </div>
                        }
                            .into_any()
                    }
                    state if state.is_empty() => {
                        view! {
                            <div class="positions-empty">
                                <p>"No positions found."</p>
                            </div>
                        }
                            .into_any()
                    }
                    ListState::Loaded(list) => {
                        view! {
                            <table class="positions-table">
                                <thead>
                                    <tr>
                                        <th>"ID"</th>
                                        <th>"Code"</th>
                                        <th>"Name"</th>
                                        <th>"Actions"</th>
                                    </tr>
                                </thead>
                                <tbody>
                                    {list
                                        .into_iter()
                                        .map(|p| {
                                            let dispatch = dispatch.clone();
                                            view! { <PositionRow position=p on_action=dispatch /> }
                                        })
                                        .collect_view()}
                                </tbody>
                            </table>
                        }
                            .into_any()
                    }
                }
            }}
        </section>
    }
}

#[component]
fn PositionRow<F>(position: Position, on_action: F) -> impl IntoView
where
    F: Fn(Action) + Clone + 'static,
{
    let idText = position.id.map(|id| id.to_string()).unwrap_or_default();
    let code = position.code.clone();
    let name = position.name.clone();
    let positionId = position.id;

    let editAction = on_action.clone();
    let deleteAction = on_action;

    view! {
        <tr>
            <td class="mono">{idText}</td>
            <td>{code}</td>
            <td>{name}</td>
            <td>
                <div class="row-actions">
                    <button
                        class="btn btn-ghost btn-sm"
                        on:click=move |_| editAction(Action::Edit(position.clone()))
                    >
                        "Edit"
                    </button>
                    <button
                        class="btn btn-danger btn-sm"
                        disabled=positionId.is_none()
                        on:click=move |_| {
                            if let Some(id) = positionId {
                                deleteAction(Action::Delete(id));
                            }
                        }
                    >
                        "Delete"
                    </button>
                </div>
            </td>
        </tr>
    }
}
