//! # Favorites
//!
//! A favorite is a document keyed by `Favorite::key(renter_id, vehicle_id)`. Its
//! presence is membership. Keying by the pair means two racing toggles can
//! only ever leave zero or one record behind, never a duplicate.

use std::sync::Arc;

use chrono::Utc;
use ridehub_core::validation::validate_id;
use ridehub_core::Favorite;
use ridehub_store::{to_data, DocumentStore};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::collections::FAVORITES;
use crate::error::EngineResult;

pub struct FavoriteToggle {
    store: Arc<dyn DocumentStore>,
}

impl FavoriteToggle {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        FavoriteToggle { store }
    }

    /// Flips membership of the pair and returns the new state.
    ///
    /// ## Example
    /// ```rust,ignore
    /// assert!(favorites.toggle("renter-1", "veh-1").await?);   // added
    /// assert!(!favorites.toggle("renter-1", "veh-1").await?);  // removed
    /// ```
    pub async fn toggle(&self, renter_id: &str, vehicle_id: &str) -> EngineResult<bool> {
        validate_id("renter_id", renter_id)?;
        validate_id("vehicle_id", vehicle_id)?;

        let key = Favorite::key(renter_id, vehicle_id);

        if self.store.get_by_id(FAVORITES, &key).await?.is_some() {
            self.store.delete(FAVORITES, &key).await?;
            info!(renter_id = %renter_id, vehicle_id = %vehicle_id, "Favorite removed");
            return Ok(false);
        }

        let favorite = Favorite {
            renter_id: renter_id.to_string(),
            vehicle_id: vehicle_id.to_string(),
            created_at: Utc::now(),
        };
        self.store.set(FAVORITES, &key, to_data(&favorite)?).await?;
        info!(renter_id = %renter_id, vehicle_id = %vehicle_id, "Favorite added");
        Ok(true)
    }

    pub async fn is_favorite(&self, renter_id: &str, vehicle_id: &str) -> EngineResult<bool> {
        let key = Favorite::key(renter_id, vehicle_id);
        Ok(self.store.get_by_id(FAVORITES, &key).await?.is_some())
    }

    /// Vehicle ids the renter has favorited, in key order.
    pub async fn favorite_ids(&self, renter_id: &str) -> EngineResult<Vec<String>> {
        favorite_vehicle_ids(self.store.as_ref(), renter_id).await
    }
}

pub(crate) async fn favorite_vehicle_ids(
    store: &dyn DocumentStore,
    renter_id: &str,
) -> EngineResult<Vec<String>> {
    let docs = store
        .query_by_field(FAVORITES, "renter_id", &Value::from(renter_id))
        .await?;

    let mut ids = Vec::with_capacity(docs.len());
    for doc in docs {
        match doc.decode::<Favorite>() {
            Ok(fav) => ids.push(fav.vehicle_id),
            Err(e) => warn!(favorite = %doc.id, error = %e, "Skipping malformed favorite"),
        }
    }

    debug!(renter_id = %renter_id, count = ids.len(), "Loaded favorites");
    Ok(ids)
}
