pub mod error;
pub mod reader;
pub mod status;
pub mod writer;

pub use error::BookingError;
pub use reader::{build_view, BookingView};
pub use status::StatusManager;
pub use writer::BookingWriter;

#[cfg(any(test, feature = "test-util"))]
pub mod memory;
