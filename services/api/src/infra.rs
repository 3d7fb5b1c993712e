use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, PoisonError};
use territory_dashboard::config::DashboardConfig;
use territory_dashboard::error::AppError;
use territory_dashboard::territories::{Category, DatasetCache, TerritoryDataset};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Shared dataset cache plus the operator defaults from configuration.
#[derive(Clone)]
pub(crate) struct DashboardState {
    cache: Arc<Mutex<DatasetCache>>,
    pub(crate) data_path: Arc<PathBuf>,
    pub(crate) min_population: u64,
    pub(crate) proximity_miles: f64,
}

impl DashboardState {
    pub(crate) fn new(config: &DashboardConfig) -> Self {
        Self {
            cache: Arc::new(Mutex::new(DatasetCache::new())),
            data_path: Arc::new(config.data_path.clone()),
            min_population: config.min_population,
            proximity_miles: config.proximity_miles,
        }
    }

    /// Cached dataset. The file stat and any CSV parse run on the blocking pool.
    pub(crate) async fn dataset(&self) -> Result<Arc<TerritoryDataset>, AppError> {
        let state = self.clone();
        run_blocking(move || {
            let mut cache = state.cache.lock().unwrap_or_else(PoisonError::into_inner);
            Ok(cache.get_or_load(state.data_path.as_path())?)
        })
        .await
    }

    pub(crate) async fn reload(&self) -> Result<Arc<TerritoryDataset>, AppError> {
        let state = self.clone();
        run_blocking(move || {
            let mut cache = state.cache.lock().unwrap_or_else(PoisonError::into_inner);
            Ok(cache.reload(state.data_path.as_path())?)
        })
        .await
    }
}

async fn run_blocking<T, F>(task: F) -> Result<T, AppError>
where
    F: FnOnce() -> Result<T, AppError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(task)
        .await
        .map_err(|err| AppError::Io(std::io::Error::new(std::io::ErrorKind::Other, err)))?
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

pub(crate) fn parse_category(raw: &str) -> Result<Category, String> {
    Category::parse(raw).ok_or_else(|| {
        let known = Category::ordered()
            .iter()
            .map(|category| category.key())
            .collect::<Vec<_>>()
            .join(", ");
        format!("unknown category '{raw}' (expected one of: {known})")
    })
}

pub(crate) fn deserialize_optional_date<'de, D>(
    deserializer: D,
) -> Result<Option<NaiveDate>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    opt.map(|value| parse_date(&value).map_err(serde::de::Error::custom))
        .transpose()
}
