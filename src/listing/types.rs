use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Geographic point attached to a listing address.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

/// Canonical address block. `private` holds the full street address and is
/// only ever disclosed to the listing owner; `public` is the coarse line
/// shown to everyone else.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Address {
    pub private: String,
    pub public: String,
    pub location: Option<Coordinates>,
}

/// Numeric statistics for a listing. Ingestion coerces unknown or
/// unparseable inputs to zero; none of these fields can hold a negative.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Characteristics {
    pub bedrooms: u32,
    pub bathrooms: u32,
    pub suites: u32,
    pub rooms: u32,
    pub garages: u32,
    pub area: f64,
    pub total_area: f64,
}

/// Viewer privilege level, decided per record at the read boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Privilege {
    Public,
    Authenticated,
    Owner,
}

impl Privilege {
    /// Privilege of an optionally-verified subject against a record owner.
    /// An empty owner id never grants ownership.
    pub fn for_subject(subject: Option<&str>, owner_id: &str) -> Self {
        match subject {
            Some(subject) if !owner_id.is_empty() && subject == owner_id => Privilege::Owner,
            Some(_) => Privilege::Authenticated,
            None => Privilege::Public,
        }
    }
}

/// The canonical in-memory listing record. Built fresh from raw JSON at
/// every ingestion boundary (create, update-merge, read-from-store); it is
/// a pure value with no identity beyond its fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Listing {
    pub id: String,
    pub title: String,
    pub description: String,
    pub price: f64,
    pub property_type: String,
    pub listing_type: String,
    pub status: String,
    pub characteristics: Characteristics,
    pub address: Address,
    /// Amenity flag set, insertion-ordered. Values are always booleans
    /// after ingestion.
    pub features: Map<String, Value>,
    /// Ordered amenity names; derived from `features` unless supplied.
    pub amenities: Vec<String>,
    pub images: Vec<String>,
    pub layout_image: Option<String>,
    pub owner_id: String,
    /// Raw creation timestamp as stored; serialized to ISO-8601 at
    /// projection time when representable.
    pub created_at: Option<Value>,
}
