pub mod flight;
pub mod repository;
pub mod seatmap;
pub mod tour;

pub use flight::Flight;
pub use repository::CatalogRepository;
pub use seatmap::SeatMap;
pub use tour::Tour;
