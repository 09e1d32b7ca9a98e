//! rowlist - demo that drives a list controller over an in-memory source

use std::time::Duration;

use async_trait::async_trait;
use rowlist::config::Settings;
use rowlist::domain::{
    map_to_code_description, unwrap_filter_value, CodeDescription, FilterValue, ListKey,
    LoadRowListResult, RowListState, Sort, SortDirection,
};
use rowlist::services::{
    Configuration, ConfigurationService, DisplayMode, PageStateStore, RowListController,
    RowListSource,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

const REGIONS: [(&str, &str); 12] = [
    ("CAR", "Cariboo"),
    ("KAM", "Kamloops"),
    ("KOO", "Kootenay"),
    ("NCO", "North Coast"),
    ("NEA", "Northeast"),
    ("NIS", "North Island"),
    ("OKA", "Okanagan"),
    ("OMI", "Omineca"),
    ("SCO", "South Coast"),
    ("SKE", "Skeena"),
    ("THO", "Thompson"),
    ("WCO", "West Coast"),
];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct RegionFilter {
    search: Option<FilterValue>,
}

struct RegionSource {
    records: Vec<Value>,
    page_size: u32,
}

impl RegionSource {
    fn new(page_size: u32) -> Self {
        let records = REGIONS
            .iter()
            .map(|(code, name)| json!({ "code": code, "name": name }))
            .collect();
        Self { records, page_size }
    }
}

#[async_trait]
impl RowListSource for RegionSource {
    type Filter = RegionFilter;
    type Row = CodeDescription;
    type Raw = (Vec<Value>, u64);

    fn key(&self) -> ListKey {
        ListKey::from("region-list")
    }

    fn label(&self) -> Option<String> {
        Some("Regions".to_string())
    }

    fn initial_state(&self) -> RowListState<RegionFilter> {
        RowListState::new(RegionFilter::default(), self.page_size).with_sort("name", SortDirection::Asc)
    }

    fn sort_columns(&self) -> Vec<CodeDescription> {
        vec![
            CodeDescription::new("code", "Code"),
            CodeDescription::new("name", "Name"),
        ]
    }

    async fn fetch_page(&self, state: &RowListState<RegionFilter>) -> anyhow::Result<Self::Raw> {
        // simulated network latency
        tokio::time::sleep(Duration::from_millis(50)).await;

        let search = unwrap_filter_value(state.filter.search.as_ref()).to_lowercase();
        let mut matching: Vec<Value> = self
            .records
            .iter()
            .filter(|record| {
                record["name"]
                    .as_str()
                    .is_some_and(|name| name.to_lowercase().contains(&search))
            })
            .cloned()
            .collect();

        if let Some(column) = state.sort_active.as_deref() {
            matching.sort_by(|a, b| a[column].as_str().cmp(&b[column].as_str()));
            if state.sort_direction == SortDirection::Desc {
                matching.reverse();
            }
        }

        let total = matching.len() as u64;
        let page = matching
            .into_iter()
            .skip(state.offset() as usize)
            .take(state.page_size as usize)
            .collect();
        Ok((page, total))
    }

    fn map_result(&self, (records, total): Self::Raw) -> LoadRowListResult<CodeDescription> {
        LoadRowListResult::new(map_to_code_description(&records, "code", "name"), total)
    }
}

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    tracing::info!("Starting rowlist demo");

    let settings = Settings::load();
    let display = ConfigurationService::new(Configuration {
        display_mode: settings.display.display_mode,
    });
    let page_sizes: Vec<String> = settings
        .row_list
        .page_size_options()
        .into_iter()
        .map(|option| option.label)
        .collect();
    tracing::info!(?page_sizes, "page size options");

    let source = RegionSource::new(settings.row_list.default_page_size);
    let controller = match RowListController::new(source, PageStateStore::global(), &settings.row_list) {
        Ok(controller) => controller,
        Err(e) => {
            tracing::error!("Failed to restore list state: {}", e);
            std::process::exit(1);
        }
    };
    controller.subscribe(|event| tracing::debug!(?event, "list event"));

    let outcome = controller.attach().await;
    tracing::info!(?outcome, summary = %controller.summary_mobile(), "initial load");

    // A burst of edits before the debounce elapses: only the last one fetches.
    let outcomes = futures::future::join_all([
        controller.on_filter_change(RegionFilter {
            search: Some("o".into()),
        }),
        controller.on_sort_change(Sort::by("name", SortDirection::Desc)),
        controller.on_page_size_change(5),
    ])
    .await;
    tracing::info!(?outcomes, "burst settled");

    if display.is_visible(DisplayMode::Mobile) {
        tracing::info!(summary = %controller.summary_mobile(), "mobile view");
    } else {
        for row in controller.rows() {
            tracing::info!(code = %row.code, description = %row.description, "row");
        }
        let window = controller.page_window();
        tracing::info!(
            first = window.first_row,
            last = window.last_row,
            total = window.row_count,
            pages = window.page_count,
            "desktop view"
        );
    }
}
