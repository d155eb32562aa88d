mod location;

pub use self::location::{LocationRecord, LocationResponse, ProviderLocation, RequestMetadata};
