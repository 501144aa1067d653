use std::sync::Arc;

use tripline_catalog::CatalogRepository;
use tripline_core::repository::BookingRepository;
use tripline_order::{BookingWriter, StatusManager};

#[derive(Clone)]
pub struct AuthConfig {
    pub secret: String,
    pub expiration: u64,
}

#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<dyn CatalogRepository>,
    pub bookings: Arc<dyn BookingRepository>,
    pub writer: Arc<BookingWriter>,
    pub status: Arc<StatusManager>,
    pub auth: AuthConfig,
}
