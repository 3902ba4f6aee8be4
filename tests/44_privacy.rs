use anyhow::Result;
use serde_json::{json, Map, Value};

use listing_core::auth::StaticVerifier;
use listing_core::config::AppConfig;
use listing_core::error::ApiError;
use listing_core::services::ListingService;
use listing_core::store::{ListingFilters, MemoryStore};

// Service-level checks: privilege resolution from bearer credentials,
// redaction on the read path, and the distinct Unauthorized / Forbidden /
// NotFound outcomes.

fn config() -> AppConfig {
    AppConfig::from_env()
}

fn service() -> ListingService<MemoryStore, StaticVerifier> {
    let config = config();
    let verifier = StaticVerifier::new()
        .with_subject("tok-owner", "u1")
        .with_subject("tok-other", "u2");
    ListingService::new(&config, MemoryStore::new(config.store.collection.clone()), verifier)
}

fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => panic!("expected object"),
    }
}

async fn seed(service: &ListingService<MemoryStore, StaticVerifier>) -> Result<String> {
    let id = service
        .create(
            Some("Bearer tok-owner"),
            json!({
                "title": "Loft",
                "price": 1500,
                "address": {
                    "private": "123 Main St",
                    "public": "Downtown",
                    "location": {"lat": 1.0, "lng": 2.0}
                }
            }),
        )
        .await
        .map_err(|e| anyhow::anyhow!("seed failed: {}", e))?;
    Ok(id)
}

#[tokio::test]
async fn detail_view_redaction_matrix() -> Result<()> {
    let service = service();
    let id = seed(&service).await?;

    // Anonymous caller, coordinates requested: private stays hidden
    let public = service.get(&id, None, true).await.unwrap();
    assert_eq!(public["address"]["private"], Value::Null);
    assert_eq!(public["location"], json!({"lat": 1.0, "lng": 2.0}));
    assert_eq!(public["display_address"], json!("Downtown"));

    // Authenticated non-owner: same redaction as anonymous
    let other = service.get(&id, Some("Bearer tok-other"), false).await.unwrap();
    assert_eq!(other["address"]["private"], Value::Null);
    assert_eq!(other["location"], Value::Null);

    // Owner with coordinates requested sees everything
    let owner = service.get(&id, Some("Bearer tok-owner"), true).await.unwrap();
    assert_eq!(owner["address"]["private"], json!("123 Main St"));
    assert_eq!(owner["address"]["location"], json!({"lat": 1.0, "lng": 2.0}));

    // Owner without the opt-in still gets no coordinates
    let owner_plain = service.get(&id, Some("Bearer tok-owner"), false).await.unwrap();
    assert_eq!(owner_plain["location"], Value::Null);
    assert_eq!(owner_plain["address"]["private"], json!("123 Main St"));
    Ok(())
}

#[tokio::test]
async fn owner_id_comes_from_the_verified_subject() -> Result<()> {
    let service = service();
    let id = service
        .create(
            Some("Bearer tok-owner"),
            json!({"title": "Loft", "owner_id": "someone-else"}),
        )
        .await
        .unwrap();

    let owner_view = service.get(&id, Some("Bearer tok-owner"), false).await.unwrap();
    assert_eq!(owner_view["owner_id"], json!("u1"));
    Ok(())
}

#[tokio::test]
async fn create_requires_authentication() {
    let service = service();
    let err = service.create(None, json!({"title": "Loft"})).await.unwrap_err();
    assert!(matches!(err, ApiError::Unauthorized(_)), "got {:?}", err);

    let err = service
        .create(Some("Bearer unknown"), json!({"title": "Loft"}))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Unauthorized(_)), "got {:?}", err);
}

#[tokio::test]
async fn create_rejects_blank_title() {
    let service = service();
    let err = service
        .create(Some("Bearer tok-owner"), json!({"title": "  "}))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::ValidationError { .. }), "got {:?}", err);
}

#[tokio::test]
async fn update_and_delete_enforce_ownership() -> Result<()> {
    let service = service();
    let id = seed(&service).await?;
    let patch = object(json!({"price": 2000}));

    let err = service.update(None, &id, &patch).await.unwrap_err();
    assert!(matches!(err, ApiError::Unauthorized(_)), "got {:?}", err);

    let err = service.update(Some("Bearer tok-other"), &id, &patch).await.unwrap_err();
    assert!(matches!(err, ApiError::Forbidden(_)), "got {:?}", err);

    service.update(Some("Bearer tok-owner"), &id, &patch).await.unwrap();
    let updated = service.get(&id, Some("Bearer tok-owner"), false).await.unwrap();
    assert_eq!(updated["price"], json!(2000.0));

    let err = service.delete(Some("Bearer tok-other"), &id).await.unwrap_err();
    assert!(matches!(err, ApiError::Forbidden(_)), "got {:?}", err);

    service.delete(Some("Bearer tok-owner"), &id).await.unwrap();
    let err = service.get(&id, None, false).await.unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)), "got {:?}", err);
    Ok(())
}

#[tokio::test]
async fn missing_records_are_not_found() {
    let service = service();
    let err = service.get("nope", None, false).await.unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)), "got {:?}", err);

    let err = service
        .update(Some("Bearer tok-owner"), "nope", &Map::new())
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)), "got {:?}", err);
}

#[tokio::test]
async fn list_views_redact_per_caller() -> Result<()> {
    let service = service();
    seed(&service).await?;

    let public = service.list(&ListingFilters::default(), None).await.unwrap();
    assert_eq!(public.len(), 1);
    assert_eq!(public[0]["address"]["private"], Value::Null);
    assert_eq!(public[0]["location"], Value::Null);

    let owned = service.list(&ListingFilters::default(), Some("Bearer tok-owner")).await.unwrap();
    assert_eq!(owned[0]["address"]["private"], json!("123 Main St"));
    // Coordinates stay suppressed on list views even for the owner
    assert_eq!(owned[0]["location"], Value::Null);
    Ok(())
}

#[tokio::test]
async fn my_listings_requires_auth_and_filters_by_owner() -> Result<()> {
    let service = service();
    seed(&service).await?;
    service
        .create(Some("Bearer tok-other"), json!({"title": "Other flat"}))
        .await
        .unwrap();

    let err = service.list_for_owner(None).await.unwrap_err();
    assert!(matches!(err, ApiError::Unauthorized(_)), "got {:?}", err);

    let mine = service.list_for_owner(Some("Bearer tok-owner")).await.unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0]["title"], json!("Loft"));
    assert_eq!(mine[0]["owner_id"], json!("u1"));
    Ok(())
}
