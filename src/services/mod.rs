pub mod listing_service;

pub use listing_service::ListingService;
