use log::error;
use yew::platform::spawn_local;
use yew::prelude::*;

use crate::config::{AUDIT_DEFAULT_PAGE_SIZE, AUDIT_PAGE_SIZES};
use crate::models::{AuditLog, Page};
use crate::notice::use_notifier;
use crate::session::use_api;
use crate::utils::{failure_text, input_value, parse_or, text_or_dash};

/// Server-side paging position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pager {
    pub page: usize,
    pub size: usize,
}

impl Default for Pager {
    fn default() -> Self {
        Pager { page: 0, size: AUDIT_DEFAULT_PAGE_SIZE }
    }
}

impl Pager {
    pub fn query(self) -> String {
        format!("/audit?page={}&size={}", self.page, self.size)
    }

    /// A new page size starts over from the first page.
    pub fn with_size(self, size: usize) -> Pager {
        Pager { page: 0, size }
    }

    pub fn prev(self) -> Pager {
        Pager { page: self.page.saturating_sub(1), ..self }
    }

    pub fn next(self, total_pages: usize) -> Pager {
        if self.page + 1 < total_pages {
            Pager { page: self.page + 1, ..self }
        } else {
            self
        }
    }

    /// `"11–20 of 42"`, or `"0 of 0"` for an empty listing.
    pub fn range_label(self, total_elements: usize) -> String {
        if total_elements == 0 {
            return "0 of 0".into();
        }
        let first = (self.page * self.size + 1).min(total_elements);
        let last = ((self.page + 1) * self.size).min(total_elements);
        format!("{first}–{last} of {total_elements}")
    }
}

#[function_component(AuditLogs)]
pub fn audit_logs() -> Html {
    let api = use_api();
    let notifier = use_notifier();
    let pager = use_state(Pager::default);
    let page = use_state(Page::<AuditLog>::default);
    let loading = use_state(|| true);

    {
        let (page, loading) = (page.clone(), loading.clone());
        use_effect_with(*pager, move |pager| {
            let query = pager.query();
            loading.set(true);
            spawn_local(async move {
                match api.get::<Page<AuditLog>>(&query).await {
                    Ok(p) => page.set(p),
                    Err(e) => {
                        error!("audit: {e}");
                        notifier.error(failure_text(&e, "Failed to fetch audit logs"));
                    }
                }
                loading.set(false);
            });
            || ()
        });
    }

    let on_size = {
        let pager = pager.clone();
        Callback::from(move |e: Event| {
            let size = parse_or(&input_value(&e), AUDIT_DEFAULT_PAGE_SIZE);
            pager.set(pager.with_size(size));
        })
    };
    let on_prev = {
        let pager = pager.clone();
        Callback::from(move |_: MouseEvent| pager.set(pager.prev()))
    };
    let on_next = {
        let pager = pager.clone();
        let total_pages = page.total_pages;
        Callback::from(move |_: MouseEvent| pager.set(pager.next(total_pages)))
    };

    html! {
        <div class="page">
            <h1>{"Audit Logs"}</h1>
            if *loading {
                <p class="loading">{"Loading…"}</p>
            } else {
                <table class="data-table">
                    <thead>
                        <tr>
                            <th>{"Timestamp"}</th><th>{"Action"}</th><th>{"User"}</th>
                            <th>{"Matricule"}</th><th>{"Details"}</th><th>{"IP Address"}</th>
                        </tr>
                    </thead>
                    <tbody>
                        if page.content.is_empty() {
                            <tr><td colspan="6" class="empty">{"No audit logs found"}</td></tr>
                        }
                        { for page.content.iter().map(|log| html! {
                            <tr key={log.id}>
                                <td>{ text_or_dash(log.timestamp.as_deref()).replace('T', " ") }</td>
                                <td>{ text_or_dash(log.action.as_deref()) }</td>
                                <td>{ text_or_dash(log.username.as_deref()) }</td>
                                <td>{ text_or_dash(log.matricule.as_deref()) }</td>
                                <td>{ text_or_dash(log.details.as_deref()) }</td>
                                <td>{ text_or_dash(log.ip_address.as_deref()) }</td>
                            </tr>
                        }) }
                    </tbody>
                </table>
            }
            <div class="pagination">
                <label>{"Rows per page"}
                    <select onchange={on_size}>
                        { for AUDIT_PAGE_SIZES.iter().map(|s| html! {
                            <option value={s.to_string()} selected={*s == pager.size}>{ s }</option>
                        }) }
                    </select>
                </label>
                <span>{ pager.range_label(page.total_elements) }</span>
                <button onclick={on_prev} disabled={pager.page == 0}>{"‹"}</button>
                <button onclick={on_next} disabled={pager.page + 1 >= page.total_pages}>{"›"}</button>
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_string() {
        assert_eq!(Pager::default().query(), "/audit?page=0&size=10");
        assert_eq!(Pager { page: 3, size: 25 }.query(), "/audit?page=3&size=25");
    }

    #[test]
    fn changing_size_resets_page() {
        let p = Pager { page: 4, size: 10 }.with_size(50);
        assert_eq!(p, Pager { page: 0, size: 50 });
    }

    #[test]
    fn navigation_is_bounded() {
        let p = Pager::default();
        assert_eq!(p.prev(), p);
        let p = p.next(3).next(3);
        assert_eq!(p.page, 2);
        assert_eq!(p.next(3).page, 2);
        assert_eq!(p.prev().page, 1);
    }

    #[test]
    fn range_labels() {
        assert_eq!(Pager { page: 1, size: 10 }.range_label(42), "11–20 of 42");
        assert_eq!(Pager { page: 4, size: 10 }.range_label(42), "41–42 of 42");
        assert_eq!(Pager::default().range_label(0), "0 of 0");
    }
}
