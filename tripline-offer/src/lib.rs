pub mod models;
pub mod repository;
pub mod resolver;

pub use models::{Discount, DiscountKind, ItemRef, PersonalizedOffer, PriceQuote};
pub use repository::DiscountRepository;
pub use resolver::resolve_price;
