use tripline_core::booking::BookingStatus;
use tripline_core::repository::StoreError;

/// Booking failure taxonomy. Display strings are the localized messages the
/// client shows; [`BookingError::code`] is the stable machine-readable kind.
#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    #[error("Укажите тур или рейс для бронирования")]
    TargetRequired,

    #[error("Нельзя бронировать тур и рейс одновременно")]
    TargetAmbiguous,

    #[error("Количество путешественников должно быть от {min} до {max}")]
    TravelersOutOfRange { min: i32, max: i32 },

    #[error("Выбрано мест: {got}, а пассажиров: {expected}")]
    SeatCountMismatch { expected: i32, got: usize },

    #[error("Некорректный номер места: {0}")]
    InvalidSeatLabel(String),

    #[error("Место {0} выбрано дважды")]
    DuplicateSeat(String),

    #[error("Место {0} отсутствует в схеме салона")]
    SeatOutsideMap(String),

    #[error("Укажите город отправления")]
    DepartureCityRequired,

    #[error("Трансфер из города {0} недоступен для этого тура")]
    DepartureCityNotServed(String),

    #[error("Тур или рейс не найден")]
    ItemNotFound,

    #[error("Предложение недоступно для бронирования")]
    ItemUnavailable,

    #[error("Места уже заняты: {}", seats.join(", "))]
    SeatConflict { seats: Vec<String> },

    #[error("Бронирование не найдено")]
    BookingNotFound,

    #[error("Недостаточно прав для этого действия")]
    Forbidden,

    #[error("Недопустимая смена статуса: {from} -> {to}")]
    InvalidTransition {
        from: BookingStatus,
        to: BookingStatus,
    },

    #[error("Внутренняя ошибка сервера")]
    Internal(#[source] StoreError),
}

impl BookingError {
    pub fn code(&self) -> &'static str {
        match self {
            BookingError::TargetRequired => "TARGET_REQUIRED",
            BookingError::TargetAmbiguous => "TARGET_AMBIGUOUS",
            BookingError::TravelersOutOfRange { .. } => "TRAVELERS_OUT_OF_RANGE",
            BookingError::SeatCountMismatch { .. } => "SEAT_COUNT_MISMATCH",
            BookingError::InvalidSeatLabel(_) => "SEAT_LABEL_INVALID",
            BookingError::DuplicateSeat(_) => "SEAT_DUPLICATE",
            BookingError::SeatOutsideMap(_) => "SEAT_OUTSIDE_MAP",
            BookingError::DepartureCityRequired => "DEPARTURE_CITY_REQUIRED",
            BookingError::DepartureCityNotServed(_) => "DEPARTURE_CITY_NOT_SERVED",
            BookingError::ItemNotFound => "ITEM_NOT_FOUND",
            BookingError::ItemUnavailable => "ITEM_UNAVAILABLE",
            BookingError::SeatConflict { .. } => "SEAT_CONFLICT",
            BookingError::BookingNotFound => "BOOKING_NOT_FOUND",
            BookingError::Forbidden => "FORBIDDEN",
            BookingError::InvalidTransition { .. } => "INVALID_TRANSITION",
            BookingError::Internal(_) => "INTERNAL",
        }
    }
}

impl From<StoreError> for BookingError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::SeatConflict { seats } => BookingError::SeatConflict { seats },
            StoreError::NotFound(_) => BookingError::BookingNotFound,
            StoreError::InvalidTransition { from, to } => {
                BookingError::InvalidTransition { from, to }
            }
            other => BookingError::Internal(other),
        }
    }
}
