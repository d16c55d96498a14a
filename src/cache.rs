//! In-memory caching using moka
//!
//! Caches the reference data that backs the office forms. Dropdown sources
//! (currencies, suppliers, tours, hotels) change a few times a week at most,
//! so a long TTL with explicit invalidation on writes works well. The
//! upcoming-schedule board is rebuilt from live bookings and only gets a
//! short TTL to absorb refresh bursts.

use moka::future::Cache;
use serde::Serialize;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::interval;
use tracing::{info, warn};

use crate::db::queries;
use crate::models::FormChoices;
use crate::operations::responses::ScheduleEntry;

/// Key under which the singleton choices bundle is stored
pub const CHOICES_KEY: &str = "choices";

/// Application cache holding form choices and schedule boards
#[derive(Clone)]
pub struct AppCache {
    /// Form dropdown sources (singleton)
    pub choices: Cache<String, Arc<FormChoices>>,
    /// Upcoming schedule boards (horizon in days -> board rows)
    pub schedules: Cache<u32, Arc<Vec<ScheduleEntry>>>,
}

impl AppCache {
    /// Create a new cache instance with configured TTLs
    pub fn new() -> Self {
        Self {
            // Choices bundle: 1 entry, 1 hour TTL, invalidated on writes
            choices: Cache::builder()
                .max_capacity(1)
                .time_to_live(Duration::from_secs(60 * 60))
                .build(),

            // Schedule boards: a handful of horizons, 60 second TTL
            schedules: Cache::builder()
                .max_capacity(8)
                .time_to_live(Duration::from_secs(60))
                .build(),
        }
    }

    /// Get cache statistics for monitoring
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            choices_cached: self.choices.entry_count() > 0,
            schedules_size: self.schedules.entry_count(),
        }
    }

    /// Invalidate the choices bundle after a reference-data write
    pub fn invalidate_choices(&self) {
        self.choices.invalidate_all();
        info!("Choices cache invalidated");
    }

    /// Invalidate all schedule boards after a booking write
    pub fn invalidate_schedules(&self) {
        self.schedules.invalidate_all();
    }
}

impl Default for AppCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Cache statistics for monitoring endpoint
#[derive(Debug, Clone, Serialize)]
pub struct CacheStats {
    pub choices_cached: bool,
    pub schedules_size: u64,
}

/// Start background cache warmer
///
/// Warms the choices bundle on startup and refreshes it every 30 minutes so
/// form loads never pay the multi-table fan-out. Schedule boards are not
/// warmed; they expire too quickly for it to matter.
pub async fn start_cache_warmer(cache: AppCache, db: PgPool) {
    warm_cache(&cache, &db).await;

    let mut interval = interval(Duration::from_secs(30 * 60));
    loop {
        interval.tick().await;
        warm_cache(&cache, &db).await;
    }
}

/// Warm the cache with commonly accessed data
async fn warm_cache(cache: &AppCache, db: &PgPool) {
    info!("Starting cache warm-up...");

    match queries::load_form_choices(db).await {
        Ok(choices) => {
            cache
                .choices
                .insert(CHOICES_KEY.to_string(), Arc::new(choices))
                .await;
        }
        Err(e) => warn!("Failed to warm choices cache: {}", e),
    }

    info!("Cache warm-up complete. Stats: {:?}", cache.stats());
}
