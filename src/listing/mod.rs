pub mod normalize;
pub mod projection;
pub mod types;

pub use normalize::ListingError;
pub use types::{Address, Characteristics, Coordinates, Listing, Privilege};
