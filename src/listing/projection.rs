use chrono::{DateTime, TimeZone, Utc};
use serde_json::{json, Map, Value};

use super::types::{Listing, Privilege};

/// Shown in place of an empty public address line.
const LOCATION_PROTECTED: &str = "Location Protected";

impl Listing {
    /// Render the record for a given viewer. `private` survives only for
    /// the owner; coordinates (nested and the legacy top-level mirror) are
    /// emitted only when explicitly requested, regardless of ownership.
    /// List views always pass `include_coordinates = false`.
    pub fn project(&self, viewer: Privilege, include_coordinates: bool) -> Value {
        Value::Object(self.project_map(viewer, include_coordinates))
    }

    /// Unredacted owner projection used for persistence. The store only
    /// ever holds this shape; redaction happens at the read boundary.
    pub fn to_doc(&self) -> Map<String, Value> {
        self.project_map(Privilege::Owner, true)
    }

    /// Public address line, or a fixed placeholder when it is empty.
    pub fn display_address(&self) -> &str {
        if self.address.public.trim().is_empty() {
            LOCATION_PROTECTED
        } else {
            &self.address.public
        }
    }

    fn project_map(&self, viewer: Privilege, include_coordinates: bool) -> Map<String, Value> {
        let location = match (&self.address.location, include_coordinates) {
            (Some(point), true) => json!(point),
            _ => Value::Null,
        };
        let private = match viewer {
            Privilege::Owner => json!(self.address.private),
            _ => Value::Null,
        };

        let mut out = Map::new();
        out.insert("id".into(), json!(self.id));
        out.insert("title".into(), json!(self.title));
        out.insert("description".into(), json!(self.description));
        out.insert("price".into(), json!(self.price));
        out.insert("property_type".into(), json!(self.property_type));
        out.insert("listing_type".into(), json!(self.listing_type));
        out.insert("status".into(), json!(self.status));
        out.insert(
            "characteristics".into(),
            json!({
                "bedrooms": self.characteristics.bedrooms,
                "bathrooms": self.characteristics.bathrooms,
                "suites": self.characteristics.suites,
                "rooms": self.characteristics.rooms,
                "garages": self.characteristics.garages,
                "area": self.characteristics.area,
                "total_area": self.characteristics.total_area,
            }),
        );
        out.insert("features".into(), Value::Object(self.features.clone()));
        out.insert("amenities".into(), json!(self.amenities));
        out.insert("images".into(), json!(self.images));
        out.insert("layout_image".into(), json!(self.layout_image));
        out.insert(
            "address".into(),
            json!({
                "private": private,
                "public": self.address.public,
                "location": location,
            }),
        );
        out.insert("display_address".into(), json!(self.display_address()));
        // Legacy clients still read coordinates from the top level
        out.insert("location".into(), location);
        out.insert("owner_id".into(), json!(self.owner_id));
        out.insert("created_at".into(), serialize_created_at(self.created_at.as_ref()));
        out
    }
}

/// ISO-8601 when the stored value parses as a timestamp (RFC 3339 string or
/// epoch seconds), its string form otherwise, null when absent.
fn serialize_created_at(value: Option<&Value>) -> Value {
    match value {
        None => Value::Null,
        Some(Value::String(raw)) => match DateTime::parse_from_rfc3339(raw) {
            Ok(ts) => Value::String(ts.with_timezone(&Utc).to_rfc3339()),
            Err(_) => Value::String(raw.clone()),
        },
        Some(Value::Number(n)) => {
            match n.as_i64().and_then(|secs| Utc.timestamp_opt(secs, 0).single()) {
                Some(ts) => Value::String(ts.to_rfc3339()),
                None => Value::String(n.to_string()),
            }
        }
        Some(other) => Value::String(other.to_string()),
    }
}
