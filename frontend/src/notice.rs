//! Transient notices (the snackbars of the app).

use std::rc::Rc;
use std::sync::atomic::{AtomicU32, Ordering};

use gloo_timers::callback::Timeout;
use yew::prelude::*;

use crate::config::NOTICE_MS;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Info,
    Warning,
    Error,
}

impl NoticeKind {
    fn class(self) -> &'static str {
        match self {
            NoticeKind::Success => "notice notice-success",
            NoticeKind::Info => "notice notice-info",
            NoticeKind::Warning => "notice notice-warning",
            NoticeKind::Error => "notice notice-error",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Notice {
    pub id: u32,
    pub kind: NoticeKind,
    pub text: String,
}

pub enum NoticeAction {
    Push(Notice),
    Dismiss(u32),
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct NoticeBoard {
    pub items: Vec<Notice>,
}

impl Reducible for NoticeBoard {
    type Action = NoticeAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut items = self.items.clone();
        match action {
            NoticeAction::Push(notice) => items.push(notice),
            NoticeAction::Dismiss(id) => items.retain(|n| n.id != id),
        }
        Rc::new(NoticeBoard { items })
    }
}

static NEXT_ID: AtomicU32 = AtomicU32::new(1);

/// Handle given to pages and guards to raise notices.
#[derive(Clone, PartialEq)]
pub struct Notifier(UseReducerDispatcher<NoticeBoard>);

impl Notifier {
    pub fn push(&self, kind: NoticeKind, text: impl Into<String>) {
        let id = NEXT_ID.fetch_add(1, Ordering::Relaxed);
        self.0.dispatch(NoticeAction::Push(Notice {
            id,
            kind,
            text: text.into(),
        }));
        let dispatcher = self.0.clone();
        Timeout::new(NOTICE_MS, move || dispatcher.dispatch(NoticeAction::Dismiss(id))).forget();
    }

    pub fn success(&self, text: impl Into<String>) {
        self.push(NoticeKind::Success, text);
    }

    pub fn info(&self, text: impl Into<String>) {
        self.push(NoticeKind::Info, text);
    }

    pub fn warn(&self, text: impl Into<String>) {
        self.push(NoticeKind::Warning, text);
    }

    pub fn error(&self, text: impl Into<String>) {
        self.push(NoticeKind::Error, text);
    }
}

#[hook]
pub fn use_notifier() -> Notifier {
    use_context::<Notifier>().expect("NoticeProvider missing")
}

#[derive(Properties, PartialEq)]
pub struct NoticeProviderProps {
    #[prop_or_default]
    pub children: Children,
}

/// Provides the [`Notifier`] and renders the stack above everything else.
#[function_component(NoticeProvider)]
pub fn notice_provider(props: &NoticeProviderProps) -> Html {
    let board = use_reducer(NoticeBoard::default);
    let notifier = Notifier(board.dispatcher());

    html! {
        <ContextProvider<Notifier> context={notifier}>
            { for props.children.iter() }
            <div class="notice-stack">
                { for board.items.iter().map(|n| {
                    let dispatcher = board.dispatcher();
                    let id = n.id;
                    let onclick = Callback::from(move |_: MouseEvent| dispatcher.dispatch(NoticeAction::Dismiss(id)));
                    html! {
                        <div class={n.kind.class()} key={n.id}>
                            <span>{ &n.text }</span>
                            <button class="notice-close" {onclick}>{"×"}</button>
                        </div>
                    }
                }) }
            </div>
        </ContextProvider<Notifier>>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn notice(id: u32, text: &str) -> Notice {
        Notice {
            id,
            kind: NoticeKind::Info,
            text: text.into(),
        }
    }

    #[test]
    fn push_appends_and_dismiss_removes_by_id() {
        let board = Rc::new(NoticeBoard::default());
        let board = board.reduce(NoticeAction::Push(notice(1, "saved")));
        let board = board.reduce(NoticeAction::Push(notice(2, "failed")));
        assert_eq!(board.items.len(), 2);

        let board = board.reduce(NoticeAction::Dismiss(1));
        assert_eq!(board.items, vec![notice(2, "failed")]);

        let board = board.reduce(NoticeAction::Dismiss(99));
        assert_eq!(board.items.len(), 1);
    }
}
