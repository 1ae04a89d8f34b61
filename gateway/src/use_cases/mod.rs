pub mod geolocation;
pub mod nearby_feed;


pub use geolocation::{PositionSource, ResolvedPosition, resolve_position};
pub use nearby_feed::{NearbyFeed, NearbyFeedUseCase};
