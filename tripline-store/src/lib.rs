pub mod app_config;
pub mod booking_repo;
pub mod catalog_repo;
pub mod database;
pub mod discount_repo;

pub use app_config::Config;
pub use booking_repo::PostgresBookingRepository;
pub use catalog_repo::PostgresCatalogRepository;
pub use database::DbClient;
pub use discount_repo::PostgresDiscountRepository;

use tripline_core::repository::StoreError;

pub(crate) fn db_err(err: sqlx::Error) -> StoreError {
    StoreError::Database(err.to_string())
}
