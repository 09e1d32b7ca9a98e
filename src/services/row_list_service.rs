//! Row list controller: the data-loading engine behind paginated lists.
//!
//! A [`RowListController`] owns the filter, sort and paging state of one
//! list view, fetches pages through a [`RowListSource`], and keeps the
//! displayed rows, total count and paging summary up to date.
//!
//! # Lifecycle
//!
//! ```text
//! new()  --> state restored from the page state store, nothing fetched
//! attach() --> first refresh
//! on_*_change() --> mutate state, refresh, persist state
//! ```
//!
//! Refreshes run on a spawned Tokio task, so the entry points must be called
//! from within a runtime. The returned futures only report the outcome:
//! dropping one does not cancel the load. A state change is saved by
//! whichever refresh settles next, even if the refresh it started was
//! superseded.
//!
//! Every refresh goes through a [`RequestGate`]. Starting a refresh aborts
//! the previous gate under the same lock that installs the new one, so at
//! most one fetch is live. Results are additionally tagged with a request
//! sequence number and discarded if a newer refresh has started, which keeps
//! stale pages off screen even when a fetch ignores cancellation.
//!
//! Fetch failures never escape: they are logged, published as
//! [`RowListEvent::LoadFailed`], and the list degrades to empty.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use futures::future::{self, BoxFuture};
use futures::FutureExt;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::app::{EventBus, RowListEvent, SubscriberId};
use crate::config::RowListSettings;
use crate::domain::{
    make_summary, CodeDescription, ListKey, LoadRowListResult, PageWindow, RowListState, Sort,
    Summary,
};

use super::page_state_service::{PageStateResult, PageStateStore};
use super::request_gate::{GateAbortHandle, GateError, RequestGate};

/// Data source for one kind of list.
///
/// Implementors supply the list identity, the default state, the fetch
/// itself, and the mapping from the raw fetch payload to display rows.
#[async_trait]
pub trait RowListSource: Send + Sync + 'static {
    /// Filter payload carried in the list state.
    type Filter: Clone + Serialize + DeserializeOwned + Send + Sync + 'static;
    /// Display row.
    type Row: Clone + Send + Sync + 'static;
    /// Raw payload returned by the fetch, before mapping.
    type Raw: Send + 'static;

    /// Stable identity of this list kind, used as the page state key.
    fn key(&self) -> ListKey;

    /// Human label stored next to the page state.
    fn label(&self) -> Option<String> {
        None
    }

    /// State used when nothing has been saved for this list yet.
    fn initial_state(&self) -> RowListState<Self::Filter>;

    /// Columns offered by the sort control.
    fn sort_columns(&self) -> Vec<CodeDescription> {
        Vec::new()
    }

    /// Fetches the page described by `state`.
    ///
    /// The future is dropped if the fetch is superseded.
    async fn fetch_page(&self, state: &RowListState<Self::Filter>) -> anyhow::Result<Self::Raw>;

    /// Maps a raw payload to display rows and the overall row count.
    fn map_result(&self, raw: Self::Raw) -> LoadRowListResult<Self::Row>;
}

/// How a refresh ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// New rows were applied.
    Loaded,
    /// The fetch failed and the list was reset to empty.
    Failed,
    /// A newer refresh superseded this one; nothing was changed.
    Aborted,
    /// Nothing was started (repeated attach).
    Skipped,
}

impl RefreshOutcome {
    /// Returns true if the refresh changed the displayed data.
    pub fn is_applied(self) -> bool {
        matches!(self, Self::Loaded | Self::Failed)
    }
}

/// Consistent snapshot of everything a list view renders.
#[derive(Debug, Clone, PartialEq)]
pub struct RowListView<R> {
    /// Rows of the current page.
    pub rows: Vec<R>,
    /// Row count across all pages.
    pub total_row_count: u64,
    /// Whether a refresh is outstanding.
    pub is_loading: bool,
    /// Compact "Showing X to Y of Z" text.
    pub summary_mobile: String,
    /// Whether compact paging controls are shown.
    pub show_paging_mobile: bool,
    /// Current page, 1-indexed.
    pub page_number: u32,
    /// Rows per page.
    pub page_size: u32,
    /// Current sort.
    pub sort: Sort,
}

struct ListData<F, R> {
    state: RowListState<F>,
    rows: Vec<R>,
    total_row_count: u64,
    is_loading: bool,
    summary: Summary,
    attached: bool,
    request_seq: u64,
    current_request: Option<GateAbortHandle>,
    state_dirty: bool,
}

struct Inner<S: RowListSource> {
    source: Arc<S>,
    key: ListKey,
    label: Option<String>,
    store: PageStateStore,
    events: EventBus,
    delay: Duration,
    default_page_size: u32,
    data: Mutex<ListData<S::Filter, S::Row>>,
}

/// Stateful engine for one filterable, sortable, paginated list.
///
/// Cloning is cheap and clones drive the same list. State-changing methods
/// apply their change and start the new fetch synchronously, then return a
/// future that completes when the fetch settles. The fetch runs on its own
/// task and completes whether or not that future is awaited.
pub struct RowListController<S: RowListSource> {
    inner: Arc<Inner<S>>,
}

impl<S: RowListSource> Clone for RowListController<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: RowListSource> RowListController<S> {
    /// Creates a controller, restoring the list state saved under the
    /// source's key or storing the source's initial state. Nothing is
    /// fetched until [`attach`](Self::attach).
    pub fn new(source: S, store: PageStateStore, settings: &RowListSettings) -> PageStateResult<Self> {
        Self::with_event_bus(source, store, settings, EventBus::new())
    }

    /// Like [`new`](Self::new), publishing events on a shared bus.
    pub fn with_event_bus(
        source: S,
        store: PageStateStore,
        settings: &RowListSettings,
        events: EventBus,
    ) -> PageStateResult<Self> {
        let key = source.key();
        let label = source.label();
        let mut state = store.get_labeled(&key, source.initial_state(), label.as_deref())?;
        state.normalize(settings.default_page_size);
        debug!(%key, page = state.page_number, size = state.page_size, "list state restored");

        let data = ListData {
            summary: make_summary(None, state.page_number, state.page_size),
            state,
            rows: Vec::new(),
            total_row_count: 0,
            is_loading: false,
            attached: false,
            request_seq: 0,
            current_request: None,
            state_dirty: false,
        };

        Ok(Self {
            inner: Arc::new(Inner {
                source: Arc::new(source),
                key,
                label,
                store,
                events,
                delay: settings.request_delay(),
                default_page_size: settings.default_page_size,
                data: Mutex::new(data),
            }),
        })
    }

    fn data(&self) -> MutexGuard<'_, ListData<S::Filter, S::Row>> {
        self.inner.data.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Key under which this list's state is stored.
    pub fn key(&self) -> &ListKey {
        &self.inner.key
    }

    /// Label stored with the list state.
    pub fn label(&self) -> Option<&str> {
        self.inner.label.as_deref()
    }

    /// The data source.
    pub fn source(&self) -> &Arc<S> {
        &self.inner.source
    }

    /// The bus this controller publishes on.
    pub fn events(&self) -> &EventBus {
        &self.inner.events
    }

    /// Registers a synchronous observer for this controller's events.
    pub fn subscribe<F>(&self, handler: F) -> SubscriberId
    where
        F: Fn(&RowListEvent) + Send + Sync + 'static,
    {
        self.inner.events.subscribe(handler)
    }

    /// Removes an observer.
    pub fn unsubscribe(&self, subscriber_id: SubscriberId) {
        self.inner.events.unsubscribe(subscriber_id);
    }

    /// Rows of the current page.
    pub fn rows(&self) -> Vec<S::Row> {
        self.data().rows.clone()
    }

    /// Row count across all pages.
    pub fn total_row_count(&self) -> u64 {
        self.data().total_row_count
    }

    /// Whether a refresh is outstanding.
    pub fn is_loading(&self) -> bool {
        self.data().is_loading
    }

    /// Compact "Showing X to Y of Z" text.
    pub fn summary_mobile(&self) -> String {
        self.data().summary.text.clone()
    }

    /// Whether compact paging controls are shown.
    pub fn show_paging_mobile(&self) -> bool {
        self.data().summary.show_paging
    }

    /// Copy of the current list state.
    pub fn state(&self) -> RowListState<S::Filter> {
        self.data().state.clone()
    }

    /// Visible row range for the pagination control.
    pub fn page_window(&self) -> PageWindow {
        let data = self.data();
        PageWindow::new(
            data.total_row_count,
            data.state.page_number,
            data.state.page_size,
        )
    }

    /// Columns offered by the sort control.
    pub fn sort_columns(&self) -> Vec<CodeDescription> {
        self.inner.source.sort_columns()
    }

    /// Consistent snapshot of everything the view renders.
    pub fn view(&self) -> RowListView<S::Row> {
        let data = self.data();
        RowListView {
            rows: data.rows.clone(),
            total_row_count: data.total_row_count,
            is_loading: data.is_loading,
            summary_mobile: data.summary.text.clone(),
            show_paging_mobile: data.summary.show_paging,
            page_number: data.state.page_number,
            page_size: data.state.page_size,
            sort: data.state.sort(),
        }
    }

    /// Signals that the view is ready and triggers the first refresh.
    ///
    /// Only the first call has an effect; later calls resolve to
    /// [`RefreshOutcome::Skipped`].
    pub fn attach(&self) -> BoxFuture<'static, RefreshOutcome> {
        {
            let mut data = self.data();
            if data.attached {
                debug!(key = %self.inner.key, "view already attached");
                return future::ready(RefreshOutcome::Skipped).boxed();
            }
            data.attached = true;
        }
        self.start_refresh(|_| {}, false)
    }

    /// Reloads the current page without changing any state.
    pub fn refresh(&self) -> BoxFuture<'static, RefreshOutcome> {
        self.start_refresh(|_| {}, false)
    }

    /// Applies a new filter and returns to the first page.
    pub fn on_filter_change(&self, filter: S::Filter) -> BoxFuture<'static, RefreshOutcome> {
        self.start_refresh(
            move |state| {
                state.filter = filter;
                state.page_number = 1;
            },
            true,
        )
    }

    /// Applies a new sort and returns to the first page.
    pub fn on_sort_change(&self, sort: Sort) -> BoxFuture<'static, RefreshOutcome> {
        self.start_refresh(
            move |state| {
                state.sort_active = sort.active;
                state.sort_direction = sort.direction;
                state.page_number = 1;
            },
            true,
        )
    }

    /// Moves to another page.
    pub fn on_page_number_change(&self, page_number: u32) -> BoxFuture<'static, RefreshOutcome> {
        self.start_refresh(move |state| state.page_number = page_number, true)
    }

    /// Changes the page size and returns to the first page. A size of zero
    /// keeps the current size.
    pub fn on_page_size_change(&self, page_size: u32) -> BoxFuture<'static, RefreshOutcome> {
        self.start_refresh(
            move |state| {
                if page_size == 0 {
                    warn!(current = state.page_size, "ignoring zero page size");
                } else {
                    state.page_size = page_size;
                }
                state.page_number = 1;
            },
            true,
        )
    }

    fn start_refresh<M>(&self, mutate: M, changes_state: bool) -> BoxFuture<'static, RefreshOutcome>
    where
        M: FnOnce(&mut RowListState<S::Filter>),
    {
        let key = &self.inner.key;
        let (seq, gate, loading_flipped) = {
            let mut data = self.data();
            mutate(&mut data.state);
            data.state.normalize(self.inner.default_page_size);
            if changes_state {
                data.state_dirty = true;
            }

            let loading_flipped = !data.is_loading;
            data.is_loading = true;

            if let Some(previous) = data.current_request.take() {
                previous.abort();
            }

            data.request_seq += 1;
            let seq = data.request_seq;
            let snapshot = data.state.clone();
            let source = Arc::clone(&self.inner.source);
            let gate = RequestGate::new(
                move || async move { source.fetch_page(&snapshot).await },
                self.inner.delay,
            );
            data.current_request = Some(gate.abort_handle());

            (seq, gate, loading_flipped)
        };

        debug!(%key, seq, "refresh started");
        if loading_flipped {
            self.inner.events.publish(RowListEvent::LoadingChanged {
                key: key.clone(),
                is_loading: true,
            });
        }

        let controller = self.clone();
        let task = tokio::spawn(async move {
            let result = gate.await;
            controller.finish_refresh(seq, result)
        });

        let key = key.clone();
        async move {
            match task.await {
                Ok(outcome) => outcome,
                Err(e) => {
                    warn!(%key, seq, "refresh task did not complete: {}", e);
                    RefreshOutcome::Aborted
                }
            }
        }
        .boxed()
    }

    fn finish_refresh(
        &self,
        seq: u64,
        result: Result<S::Raw, GateError<anyhow::Error>>,
    ) -> RefreshOutcome {
        let key = &self.inner.key;
        let current = self.data().request_seq;
        if current != seq {
            debug!(%key, seq, current, "discarding stale result");
            return RefreshOutcome::Aborted;
        }

        let loaded = match result {
            Ok(raw) => Ok(self.inner.source.map_result(raw)),
            Err(GateError::Aborted(stage)) => {
                debug!(%key, seq, %stage, "refresh superseded");
                return RefreshOutcome::Aborted;
            }
            Err(GateError::Failed(e)) => Err(e),
        };

        let mut events = Vec::new();
        let (outcome, saved_state) = {
            let mut data = self.data();
            if data.request_seq != seq {
                debug!(%key, seq, current = data.request_seq, "discarding stale result");
                return RefreshOutcome::Aborted;
            }
            data.current_request = None;

            let outcome = match loaded {
                Ok(LoadRowListResult {
                    rows,
                    total_row_count,
                }) => {
                    debug!(%key, seq, rows = rows.len(), total_row_count, "page loaded");
                    data.rows = rows;
                    data.total_row_count = total_row_count;
                    RefreshOutcome::Loaded
                }
                Err(e) => {
                    warn!(%key, seq, "failed to load list page: {:#}", e);
                    data.rows = Vec::new();
                    data.total_row_count = 0;
                    events.push(RowListEvent::LoadFailed {
                        key: key.clone(),
                        message: format!("{e:#}"),
                    });
                    RefreshOutcome::Failed
                }
            };

            if data.is_loading {
                data.is_loading = false;
                events.push(RowListEvent::LoadingChanged {
                    key: key.clone(),
                    is_loading: false,
                });
            }

            data.summary = make_summary(
                Some(data.total_row_count),
                data.state.page_number,
                data.state.page_size,
            );
            events.push(RowListEvent::RepaintRequested { key: key.clone() });

            let saved_state = std::mem::take(&mut data.state_dirty).then(|| data.state.clone());
            (outcome, saved_state)
        };

        if let Some(state) = saved_state {
            match self.inner.store.set(key, &state, self.inner.label.as_deref()) {
                Ok(()) => events.push(RowListEvent::StateSaved { key: key.clone() }),
                Err(e) => warn!(%key, "failed to save list state: {}", e),
            }
        }

        for event in events {
            self.inner.events.publish(event);
        }

        outcome
    }
}

impl<S: RowListSource> std::fmt::Debug for RowListController<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let data = self.data();
        f.debug_struct("RowListController")
            .field("key", &self.inner.key)
            .field("page_number", &data.state.page_number)
            .field("page_size", &data.state.page_size)
            .field("total_row_count", &data.total_row_count)
            .field("is_loading", &data.is_loading)
            .finish()
    }
}
