pub mod radius;

pub use radius::{parse_radius_response, RadiusApiClient};
