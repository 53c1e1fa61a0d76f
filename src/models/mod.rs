pub mod airbnb;
pub mod coordinates;
pub mod poi;
pub mod rating;

pub use airbnb::Airbnb;
pub use coordinates::Coordinates;
pub use poi::{Category, Poi};
pub use rating::TrailRating;
