use chrono::Utc;
use serde_json::{Map, Value};

use crate::listing::{Listing, ListingError, Privilege};

use super::{Condition, DocumentStore, QueryOp, StoreError};

/// Errors crossing the listing store boundary.
#[derive(Debug, thiserror::Error)]
pub enum ListingStoreError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Listing(#[from] ListingError),
}

/// Query-style filters for listing collections, composed externally into
/// the equality/range conditions the document store understands.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListingFilters {
    pub property_type: Option<String>,
    pub listing_type: Option<String>,
    pub status: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
}

impl ListingFilters {
    /// Parse from raw query-string pairs. Unknown keys and unparseable
    /// prices are ignored, matching the lenient ingestion policy.
    pub fn from_params<'a>(params: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let mut filters = Self::default();
        for (key, value) in params {
            match key {
                "type" | "property_type" => filters.property_type = Some(value.to_string()),
                "listing_type" => filters.listing_type = Some(value.to_string()),
                "status" => filters.status = Some(value.to_string()),
                "min_price" => filters.min_price = value.trim().parse().ok(),
                "max_price" => filters.max_price = value.trim().parse().ok(),
                _ => {}
            }
        }
        filters
    }

    pub fn to_conditions(&self) -> Vec<Condition> {
        let mut conditions = Vec::new();
        if let Some(ref property_type) = self.property_type {
            conditions.push(Condition::eq("property_type", property_type.clone()));
        }
        if let Some(ref listing_type) = self.listing_type {
            conditions.push(Condition::eq("listing_type", listing_type.clone()));
        }
        if let Some(ref status) = self.status {
            conditions.push(Condition::eq("status", status.clone()));
        }
        if let Some(min) = self.min_price {
            conditions.push(Condition::range("price", QueryOp::Gte, min));
        }
        if let Some(max) = self.max_price {
            conditions.push(Condition::range("price", QueryOp::Lte, max));
        }
        conditions
    }
}

/// Adapter between the canonical listing model and the raw document
/// collection. Every boundary crossing goes through the normalizer: the
/// store may still hold documents written under any historical schema, and
/// nothing is migrated in place.
pub struct ListingStore<S> {
    store: S,
}

impl<S: DocumentStore> ListingStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Fetch one listing, re-normalizing whatever shape the document holds.
    pub async fn fetch(&self, id: &str) -> Result<Option<Listing>, ListingStoreError> {
        match self.store.get(id).await? {
            Some(doc) => Ok(Some(Listing::from_json(&Value::Object(doc))?)),
            None => Ok(None),
        }
    }

    /// Persist a new listing as its unredacted owner projection, stamping
    /// `created_at` when the caller did not supply one.
    pub async fn create(&self, mut listing: Listing) -> Result<String, ListingStoreError> {
        if listing.created_at.is_none() {
            listing.created_at = Some(Value::String(Utc::now().to_rfc3339()));
        }
        self.store.put(&listing.id, listing.to_doc()).await?;
        Ok(listing.id)
    }

    /// Read-merge-normalize-write. No isolation against a concurrent writer
    /// to the same record; the last write wins. Returns whether the record
    /// existed. `id` is immutable across the merge.
    pub async fn update(
        &self,
        id: &str,
        patch: &Map<String, Value>,
    ) -> Result<bool, ListingStoreError> {
        let Some(mut merged) = self.store.get(id).await? else {
            return Ok(false);
        };
        for (key, value) in patch {
            if key == "id" {
                continue;
            }
            merged.insert(key.clone(), value.clone());
        }
        merged.insert("id".to_string(), Value::String(id.to_string()));

        let listing = Listing::from_json(&Value::Object(merged))?;
        // Replace, don't merge: a stored legacy document may carry stale
        // flat keys (top-level stats, `private_address`) that would shadow
        // the normalized nested values on the next read.
        self.store.put(id, listing.to_doc()).await?;
        Ok(true)
    }

    pub async fn delete(&self, id: &str) -> Result<bool, ListingStoreError> {
        Ok(self.store.delete(id).await?)
    }

    /// Filtered collection read, projected per record for the given viewer.
    /// Coordinates are always suppressed on list views.
    pub async fn list(
        &self,
        filters: &ListingFilters,
        subject: Option<&str>,
    ) -> Result<Vec<Value>, ListingStoreError> {
        let docs = self.store.query(&filters.to_conditions()).await?;
        Ok(project_all(docs, subject))
    }

    /// All listings belonging to one owner, projected with owner privilege.
    pub async fn list_by_owner(&self, owner_id: &str) -> Result<Vec<Value>, ListingStoreError> {
        let docs = self.store.query(&[Condition::eq("owner_id", owner_id)]).await?;
        Ok(project_all(docs, Some(owner_id)))
    }
}

/// Bulk projection with per-document fault isolation: a document that fails
/// normalization is logged and skipped, never allowed to fail the whole
/// collection response.
fn project_all(docs: Vec<Map<String, Value>>, subject: Option<&str>) -> Vec<Value> {
    docs.into_iter()
        .filter_map(|doc| {
            let id = doc.get("id").and_then(Value::as_str).unwrap_or("").to_string();
            match Listing::from_json(&Value::Object(doc)) {
                Ok(listing) => {
                    let viewer = Privilege::for_subject(subject, &listing.owner_id);
                    Some(listing.project(viewer, false))
                }
                Err(err) => {
                    tracing::warn!(id = %id, error = %err, "skipping corrupt listing document");
                    None
                }
            }
        })
        .collect()
}
