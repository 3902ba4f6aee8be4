use serde_json::{Map, Value};

use crate::auth::{bearer_token, IdentityVerifier};
use crate::config::AppConfig;
use crate::error::ApiError;
use crate::listing::{Listing, Privilege};
use crate::store::{DocumentStore, ListingFilters, ListingStore};

/// Application layer over the listing store: resolves the caller's verified
/// identity, enforces ownership, and reports distinct outcomes (NotFound,
/// Forbidden, Unauthorized) above the pure normalize/project core.
pub struct ListingService<S, V> {
    listings: ListingStore<S>,
    verifier: V,
    max_page_size: usize,
}

impl<S: DocumentStore, V: IdentityVerifier> ListingService<S, V> {
    pub fn new(config: &AppConfig, store: S, verifier: V) -> Self {
        Self {
            listings: ListingStore::new(store),
            verifier,
            max_page_size: config.store.max_page_size,
        }
    }

    /// Filtered collection read. Viewer privilege is computed per record
    /// for whoever the credential verifies as; coordinates are never
    /// included on list views.
    pub async fn list(
        &self,
        filters: &ListingFilters,
        authorization: Option<&str>,
    ) -> Result<Vec<Value>, ApiError> {
        let subject = self.subject(authorization).await;
        let mut out = self.listings.list(filters, subject.as_deref()).await?;
        out.truncate(self.max_page_size);
        Ok(out)
    }

    /// Detail read. `include_coordinates` is the caller's explicit opt-in
    /// for map previews; the private address line still depends solely on
    /// ownership.
    pub async fn get(
        &self,
        id: &str,
        authorization: Option<&str>,
        include_coordinates: bool,
    ) -> Result<Value, ApiError> {
        let subject = self.subject(authorization).await;
        let listing = self.fetch_or_404(id).await?;
        let viewer = Privilege::for_subject(subject.as_deref(), &listing.owner_id);
        Ok(listing.project(viewer, include_coordinates))
    }

    /// Create a listing owned by the verified caller. `owner_id` in the
    /// body is always overwritten with the verified subject.
    pub async fn create(
        &self,
        authorization: Option<&str>,
        mut body: Value,
    ) -> Result<String, ApiError> {
        let subject = self.require_subject(authorization).await?;
        if let Some(map) = body.as_object_mut() {
            map.insert("owner_id".to_string(), Value::String(subject));
        }
        let listing = Listing::from_json(&body)?;
        Ok(self.listings.create(listing).await?)
    }

    /// Merge-update a listing. Auth and ownership required.
    pub async fn update(
        &self,
        authorization: Option<&str>,
        id: &str,
        patch: &Map<String, Value>,
    ) -> Result<(), ApiError> {
        let subject = self.require_subject(authorization).await?;
        let existing = self.fetch_or_404(id).await?;
        if existing.owner_id != subject {
            return Err(ApiError::forbidden("not the listing owner"));
        }
        if !self.listings.update(id, patch).await? {
            return Err(ApiError::not_found("listing not found"));
        }
        Ok(())
    }

    /// Delete a listing. Auth and ownership required.
    pub async fn delete(&self, authorization: Option<&str>, id: &str) -> Result<(), ApiError> {
        let subject = self.require_subject(authorization).await?;
        let existing = self.fetch_or_404(id).await?;
        if existing.owner_id != subject {
            return Err(ApiError::forbidden("not the listing owner"));
        }
        self.listings.delete(id).await?;
        Ok(())
    }

    /// The verified caller's own listings, owner-projected.
    pub async fn list_for_owner(
        &self,
        authorization: Option<&str>,
    ) -> Result<Vec<Value>, ApiError> {
        let subject = self.require_subject(authorization).await?;
        Ok(self.listings.list_by_owner(&subject).await?)
    }

    async fn fetch_or_404(&self, id: &str) -> Result<Listing, ApiError> {
        self.listings
            .fetch(id)
            .await?
            .ok_or_else(|| ApiError::not_found("listing not found"))
    }

    async fn subject(&self, authorization: Option<&str>) -> Option<String> {
        let token = bearer_token(authorization?)?;
        self.verifier.verify(token).await
    }

    async fn require_subject(&self, authorization: Option<&str>) -> Result<String, ApiError> {
        self.subject(authorization)
            .await
            .ok_or_else(|| ApiError::unauthorized("authentication required"))
    }
}
