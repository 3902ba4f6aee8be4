use serde_json::{Map, Value};
use uuid::Uuid;

use super::types::{Address, Characteristics, Coordinates, Listing};

/// Keys inside a legacy `characteristics` bag that are statistics rather
/// than amenity flags. Anything else in the bag is treated as a flag.
const STAT_KEYS: &[&str] = &[
    "bedrooms",
    "bathrooms",
    "suites",
    "rooms",
    "garages",
    "area",
    "total",
    "total_area",
];

/// Errors the normalizer can produce. Everything else is coerced silently
/// so that malformed historical documents stay readable.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ListingError {
    #[error("title required")]
    TitleRequired,
    #[error("expected a JSON object")]
    InvalidShape,
}

impl Listing {
    /// Build the canonical record from raw JSON in any of the supported
    /// historical shapes: flat legacy fields, the mixed `characteristics`
    /// bag, or the current nested schema. Total except for a trimmed-empty
    /// `title`, which is the single fatal validation.
    pub fn from_json(raw: &Value) -> Result<Self, ListingError> {
        let raw = raw.as_object().ok_or(ListingError::InvalidShape)?;

        let title = coerce_string(raw.get("title"));
        if title.trim().is_empty() {
            return Err(ListingError::TitleRequired);
        }

        let id = match raw.get("id").and_then(Value::as_str) {
            Some(id) if !id.trim().is_empty() => id.to_string(),
            _ => Uuid::new_v4().to_string(),
        };

        let features = extract_features(raw);
        let amenities = extract_amenities(raw, &features);

        Ok(Listing {
            id,
            title,
            description: coerce_string(raw.get("description")),
            price: coerce_quantity(raw.get("price")),
            property_type: non_empty_or(coerce_string(raw.get("property_type")), "house"),
            listing_type: non_empty_or(coerce_string(raw.get("listing_type")), "sale"),
            status: non_empty_or(coerce_string(raw.get("status")), "available"),
            characteristics: extract_characteristics(raw),
            address: extract_address(raw),
            features,
            amenities,
            images: coerce_string_list(raw.get("images")),
            layout_image: raw
                .get("layout_image")
                .and_then(Value::as_str)
                .filter(|url| !url.is_empty())
                .map(str::to_string),
            owner_id: coerce_string(raw.get("owner_id")),
            created_at: raw.get("created_at").filter(|v| !v.is_null()).cloned(),
        })
    }
}

// ========================================
// Shape extraction strategies
// ========================================

/// Statistic lookup with migration precedence: top-level key first, then
/// the legacy `characteristics` bag (the current nested schema also keeps
/// statistics there), then the caller's default via the coercers.
fn stat_value<'a>(raw: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    raw.get(key).filter(|v| !v.is_null()).or_else(|| {
        raw.get("characteristics")
            .and_then(Value::as_object)
            .and_then(|bag| bag.get(key))
    })
}

fn extract_characteristics(raw: &Map<String, Value>) -> Characteristics {
    Characteristics {
        bedrooms: coerce_count(stat_value(raw, "bedrooms")),
        bathrooms: coerce_count(stat_value(raw, "bathrooms")),
        suites: coerce_count(stat_value(raw, "suites")),
        rooms: coerce_count(stat_value(raw, "rooms")),
        garages: coerce_count(stat_value(raw, "garages")),
        area: coerce_quantity(stat_value(raw, "area")),
        // Oldest documents wrote the lot size as `total`
        total_area: coerce_quantity(
            stat_value(raw, "total_area").or_else(|| stat_value(raw, "total")),
        ),
    }
}

/// Address extraction: a mapping under `address` is the canonical nested
/// shape; anything else falls back to the legacy flat keys, where `address`
/// itself was the private street line.
fn extract_address(raw: &Map<String, Value>) -> Address {
    match raw.get("address") {
        Some(Value::Object(nested)) => Address {
            private: coerce_string(nested.get("private")),
            public: coerce_string(nested.get("public")),
            location: extract_coordinates(nested.get("location"))
                .or_else(|| extract_coordinates(raw.get("location"))),
        },
        legacy => {
            let private = match raw.get("private_address") {
                Some(Value::String(line)) if !line.is_empty() => line.clone(),
                _ => coerce_string(legacy),
            };
            Address {
                private,
                public: coerce_string(raw.get("public_address")),
                location: extract_coordinates(raw.get("location")),
            }
        }
    }
}

fn extract_coordinates(value: Option<&Value>) -> Option<Coordinates> {
    let point = value?.as_object()?;
    let lat = point.get("lat").and_then(Value::as_f64)?;
    let lng = point.get("lng").and_then(Value::as_f64)?;
    Some(Coordinates { lat, lng })
}

/// Amenity flag set: an explicit `features` mapping wins; otherwise the
/// legacy `characteristics` bag minus the statistic keys, every remaining
/// entry coerced to a boolean flag.
fn extract_features(raw: &Map<String, Value>) -> Map<String, Value> {
    if let Some(Value::Object(explicit)) = raw.get("features") {
        return explicit
            .iter()
            .map(|(name, flag)| (name.clone(), Value::Bool(coerce_flag(flag))))
            .collect();
    }

    let mut flags = Map::new();
    if let Some(Value::Object(bag)) = raw.get("characteristics") {
        for (key, value) in bag {
            if STAT_KEYS.contains(&key.as_str()) {
                continue;
            }
            flags.insert(key.clone(), Value::Bool(coerce_flag(value)));
        }
    }
    flags
}

fn extract_amenities(raw: &Map<String, Value>, features: &Map<String, Value>) -> Vec<String> {
    match raw.get("amenities") {
        Some(list @ Value::Array(_)) => coerce_string_list(Some(list)),
        _ => features
            .iter()
            .filter(|(_, flag)| flag.as_bool() == Some(true))
            .map(|(name, _)| name.clone())
            .collect(),
    }
}

// ========================================
// Lenient coercion
// ========================================

/// Non-negative integer coercion. Strings are parsed, fractions truncated,
/// negatives and garbage become zero.
fn coerce_count(value: Option<&Value>) -> u32 {
    match value {
        Some(Value::Number(n)) => n
            .as_f64()
            .filter(|f| f.is_finite() && *f > 0.0)
            .map(|f| f as u32)
            .unwrap_or(0),
        Some(Value::String(s)) => match s.trim().parse::<f64>() {
            Ok(f) if f.is_finite() && f > 0.0 => f as u32,
            _ => 0,
        },
        _ => 0,
    }
}

/// Non-negative float coercion with the same fallback policy.
fn coerce_quantity(value: Option<&Value>) -> f64 {
    match value {
        Some(Value::Number(n)) => n.as_f64().filter(|f| f.is_finite() && *f >= 0.0).unwrap_or(0.0),
        Some(Value::String(s)) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|f| f.is_finite() && *f >= 0.0)
            .unwrap_or(0.0),
        _ => 0.0,
    }
}

fn coerce_flag(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(false),
        Value::String(s) => matches!(s.trim().to_ascii_lowercase().as_str(), "true" | "yes" | "1"),
        _ => false,
    }
}

fn coerce_string(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

fn coerce_string_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| item.as_str().map(str::to_string))
            .collect(),
        _ => Vec::new(),
    }
}

fn non_empty_or(value: String, default: &str) -> String {
    if value.trim().is_empty() {
        default.to_string()
    } else {
        value
    }
}
