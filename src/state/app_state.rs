// Shared request-handling state
// Built once at startup and shared read-only across requests

use crate::config::{ApiKey, Config, SourceMode};
use crate::middleware::RateLimiter;
use crate::services::records::RecordCollection;
use crate::services::workbook::{SheetSource, SourceError, WorkbookDirectory};
use std::sync::Arc;

/// The single workbook served on the fixed data route
#[derive(Debug, Clone)]
pub struct FixedSource {
    /// Workbook file name inside the data directory
    pub file: String,
    /// Sheet to serve; first sheet when `None`
    pub sheet: Option<String>,
    /// Route path the source is mounted at
    pub route: String,
    /// Records decoded at startup in eager mode
    pub snapshot: Option<Arc<RecordCollection>>,
}

/// Main application state
pub struct AppState {
    /// Secret clients must present
    pub api_key: ApiKey,
    /// Rows per page
    pub per_page: usize,
    /// Where workbooks are read from
    pub source: Arc<dyn SheetSource>,
    /// Source served on the fixed data route
    pub fixed: FixedSource,
    /// Per-client limiter; `None` when disabled
    pub rate_limiter: Option<RateLimiter>,
}

impl AppState {
    /// Build state reading workbooks from the configured data directory
    pub async fn from_config(config: &Config) -> Result<Self, SourceError> {
        let source = Arc::new(WorkbookDirectory::new(config.source.data_dir.clone()));
        Self::with_source(config, source).await
    }

    /// Build state around an arbitrary source.
    ///
    /// In eager mode the fixed source is decoded here; failure to decode it
    /// is returned to the caller instead of serving an empty collection.
    pub async fn with_source(
        config: &Config,
        source: Arc<dyn SheetSource>,
    ) -> Result<Self, SourceError> {
        let snapshot = match config.source.mode {
            SourceMode::Lazy => None,
            SourceMode::Eager => {
                let records = source
                    .load_sheet(&config.source.data_file, config.source.data_sheet.as_deref())
                    .await?;
                tracing::info!(
                    file = %config.source.data_file,
                    rows = records.len(),
                    "Loaded fixed source at startup"
                );
                Some(Arc::new(records))
            }
        };

        let rate_limiter =
            (config.rate_limit_per_hour > 0).then(|| RateLimiter::per_hour(config.rate_limit_per_hour));

        Ok(Self {
            api_key: config.api_key.clone(),
            per_page: config.per_page,
            source,
            fixed: FixedSource {
                file: config.source.data_file.clone(),
                sheet: config.source.data_sheet.clone(),
                route: config.source.data_route.clone(),
                snapshot,
            },
            rate_limiter,
        })
    }

    /// Records of the fixed source: the startup snapshot, or a fresh decode
    pub async fn fixed_records(&self) -> Result<Arc<RecordCollection>, SourceError> {
        if let Some(snapshot) = &self.fixed.snapshot {
            return Ok(Arc::clone(snapshot));
        }

        let records = self
            .source
            .load_sheet(&self.fixed.file, self.fixed.sheet.as_deref())
            .await?;
        Ok(Arc::new(records))
    }
}
