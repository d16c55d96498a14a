//! Form choice endpoint backed by the reference-data cache.

use std::sync::Arc;

use axum::{extract::State, Json};

use crate::cache::CHOICES_KEY;
use crate::db::queries;
use crate::error::Result;
use crate::models::FormChoices;
use crate::AppState;

/// Every dropdown source the booking forms need, in one payload.
///
/// Served from cache; a miss rebuilds the bundle and re-primes it so the
/// next form load is cheap again.
pub async fn form_choices(State(state): State<AppState>) -> Result<Json<Arc<FormChoices>>> {
    if let Some(choices) = state.cache.choices.get(CHOICES_KEY).await {
        tracing::debug!("form choices cache hit");
        return Ok(Json(choices));
    }

    tracing::debug!("form choices cache miss, rebuilding");
    let choices = Arc::new(queries::load_form_choices(&state.db).await?);
    state
        .cache
        .choices
        .insert(CHOICES_KEY.to_string(), choices.clone())
        .await;
    Ok(Json(choices))
}
