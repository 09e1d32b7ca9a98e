//! Integration tests for the list services.
//!
//! These tests drive the public API across module boundaries: a controller
//! backed by a source, the shared page state store, the event bus, and
//! settings. Each module contains its own unit tests for detailed logic.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use pretty_assertions::assert_eq;
use rowlist::app::{EventBus, RowListEvent};
use rowlist::config::{RowListSettings, Settings};
use rowlist::domain::{
    make_summary, ListKey, LoadRowListResult, RowListState, Sort, SortDirection, Summary,
    NO_RECORDS,
};
use rowlist::services::{
    GateError, PageStateStore, RefreshOutcome, RequestGate, RowListController, RowListSource,
};
use serde::{Deserialize, Serialize};

// ============================================================================
// Test source
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
struct OrderFilter {
    customer: Option<String>,
}

struct OrderSource {
    key: &'static str,
    orders: Vec<(u32, String)>,
    fetches: Arc<AtomicUsize>,
}

impl OrderSource {
    fn new(key: &'static str, count: u32) -> Self {
        let orders = (1..=count)
            .map(|id| (id, if id % 3 == 0 { "acme" } else { "globex" }.to_string()))
            .collect();
        Self {
            key,
            orders,
            fetches: Arc::new(AtomicUsize::new(0)),
        }
    }
}

#[async_trait]
impl RowListSource for OrderSource {
    type Filter = OrderFilter;
    type Row = u32;
    type Raw = (Vec<u32>, u64);

    fn key(&self) -> ListKey {
        ListKey::from(self.key)
    }

    fn initial_state(&self) -> RowListState<OrderFilter> {
        RowListState::new(OrderFilter::default(), 10)
    }

    async fn fetch_page(&self, state: &RowListState<OrderFilter>) -> anyhow::Result<(Vec<u32>, u64)> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(100)).await;

        let mut ids: Vec<u32> = self
            .orders
            .iter()
            .filter(|(_, customer)| state.filter.customer.as_ref().map_or(true, |c| c == customer))
            .map(|(id, _)| *id)
            .collect();
        if state.sort_direction == SortDirection::Desc {
            ids.reverse();
        }

        let total = ids.len() as u64;
        let page = ids
            .into_iter()
            .skip(state.offset() as usize)
            .take(state.page_size as usize)
            .collect();
        Ok((page, total))
    }

    fn map_result(&self, (rows, total): (Vec<u32>, u64)) -> LoadRowListResult<u32> {
        LoadRowListResult::new(rows, total)
    }
}

fn fast_settings() -> RowListSettings {
    RowListSettings {
        request_delay_ms: 50,
        ..RowListSettings::default()
    }
}

// ============================================================================
// Controller Tests
// ============================================================================

#[tokio::test(start_paused = true)]
async fn state_round_trips_through_shared_store() {
    let store = PageStateStore::new();

    let first = RowListController::new(OrderSource::new("orders", 40), store.clone(), &fast_settings())
        .unwrap();
    first.attach().await;
    first
        .on_filter_change(OrderFilter {
            customer: Some("acme".to_string()),
        })
        .await;
    first
        .on_sort_change(Sort::by("id", SortDirection::Desc))
        .await;
    first.on_page_size_change(50).await;
    drop(first);

    let second =
        RowListController::new(OrderSource::new("orders", 40), store, &fast_settings()).unwrap();
    let state = second.state();

    assert_eq!(state.page_size, 50);
    assert_eq!(state.page_number, 1);
    assert_eq!(state.filter.customer.as_deref(), Some("acme"));
    assert_eq!(state.sort_direction, SortDirection::Desc);
    assert!(second.rows().is_empty());
}

#[tokio::test(start_paused = true)]
async fn different_keys_do_not_share_state() {
    let store = PageStateStore::new();

    let orders =
        RowListController::new(OrderSource::new("orders", 40), store.clone(), &fast_settings())
            .unwrap();
    orders.on_page_size_change(5).await;

    let archive =
        RowListController::new(OrderSource::new("archived-orders", 40), store.clone(), &fast_settings())
            .unwrap();

    assert_eq!(archive.state().page_size, 10);
    assert_eq!(store.len(), 2);
}

#[tokio::test(start_paused = true)]
async fn burst_of_actions_fetches_once() {
    let source = OrderSource::new("orders", 40);
    let fetches = Arc::clone(&source.fetches);
    let controller = RowListController::new(source, PageStateStore::new(), &fast_settings()).unwrap();

    let outcomes = futures::future::join_all(
        (1..=4)
            .map(|page| controller.on_page_number_change(page))
            .collect::<Vec<_>>(),
    )
    .await;

    assert_eq!(outcomes.iter().filter(|o| o.is_applied()).count(), 1);
    assert_eq!(outcomes.last(), Some(&RefreshOutcome::Loaded));
    assert_eq!(fetches.load(Ordering::SeqCst), 1);
    assert_eq!(controller.rows(), (31..=40).collect::<Vec<_>>());
    assert_eq!(controller.summary_mobile(), "Showing 31 to 40 of 40");
}

#[tokio::test(start_paused = true)]
async fn shared_event_bus_sees_every_list() {
    let bus = EventBus::new();
    let keys = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&keys);
    bus.subscribe(move |event| {
        if let RowListEvent::StateSaved { key } = event {
            sink.lock().unwrap().push(key.to_string());
        }
    });

    let store = PageStateStore::new();
    let a = RowListController::with_event_bus(
        OrderSource::new("orders", 10),
        store.clone(),
        &fast_settings(),
        bus.clone(),
    )
    .unwrap();
    let b = RowListController::with_event_bus(
        OrderSource::new("returns", 10),
        store,
        &fast_settings(),
        bus,
    )
    .unwrap();

    a.on_page_number_change(1).await;
    b.on_page_number_change(1).await;

    assert_eq!(*keys.lock().unwrap(), vec!["orders".to_string(), "returns".to_string()]);
}

#[tokio::test(start_paused = true)]
async fn empty_source_shows_no_records() {
    let controller =
        RowListController::new(OrderSource::new("empty", 0), PageStateStore::new(), &fast_settings())
            .unwrap();

    assert_eq!(controller.attach().await, RefreshOutcome::Loaded);
    assert_eq!(controller.summary_mobile(), NO_RECORDS);
    assert!(!controller.show_paging_mobile());
}

// ============================================================================
// Gate and Summary Tests
// ============================================================================

#[tokio::test(start_paused = true)]
async fn gate_abort_is_not_a_failure() {
    let gate: RequestGate<u32, anyhow::Error> =
        RequestGate::new(|| async { Ok(1) }, Duration::from_millis(500));
    let handle = gate.abort_handle();
    handle.abort();

    let err = gate.await.unwrap_err();
    assert!(err.is_aborted());
    assert!(matches!(err, GateError::Aborted(_)));
}

#[test]
fn summary_examples() {
    let cases = [
        (Some(0), 1, 10, NO_RECORDS, false),
        (None, 1, 10, NO_RECORDS, false),
        (Some(25), 1, 10, "Showing 1 to 10 of 25", true),
        (Some(25), 3, 10, "Showing 21 to 25 of 25", true),
        (Some(25), 99, 10, "Showing 21 to 25 of 25", true),
    ];

    for (rows, page, size, text, show_paging) in cases {
        assert_eq!(
            make_summary(rows, page, size),
            Summary {
                text: text.to_string(),
                show_paging,
            }
        );
    }
}

#[test]
fn settings_drive_request_delay() {
    let mut settings = Settings::default();
    settings.row_list.request_delay_ms = 1200;
    assert_eq!(settings.row_list.request_delay(), Duration::from_millis(1200));
}
