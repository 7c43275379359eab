use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use worldbite_core::error::error_response;
use worldbite_domain::order::{OrderAction, OrderStatus};

/// Orders service error variants.
#[derive(Debug, thiserror::Error)]
pub enum OrdersError {
    #[error("{0}")]
    Validation(String),
    #[error("restaurant not found")]
    RestaurantNotFound,
    #[error("restaurant is not accepting orders")]
    RestaurantInactive,
    #[error("dish not found")]
    DishNotFound,
    #[error("dish {0:?} is unavailable")]
    DishUnavailable(String),
    #[error("order not found")]
    OrderNotFound,
    #[error("cannot {action} an order that is {status}")]
    InvalidTransition {
        status: OrderStatus,
        action: OrderAction,
    },
    #[error("order status changed concurrently, reload and retry")]
    StatusConflict,
    #[error("invalid or already-used code")]
    InvalidPickupCode,
    #[error("{0}")]
    Conflict(String),
    #[error("forbidden")]
    Forbidden,
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl OrdersError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "INVALID_INPUT",
            Self::RestaurantNotFound => "RESTAURANT_NOT_FOUND",
            Self::RestaurantInactive => "RESTAURANT_INACTIVE",
            Self::DishNotFound => "DISH_NOT_FOUND",
            Self::DishUnavailable(_) => "DISH_UNAVAILABLE",
            Self::OrderNotFound => "ORDER_NOT_FOUND",
            Self::InvalidTransition { .. } => "INVALID_TRANSITION",
            Self::StatusConflict => "STATUS_CONFLICT",
            Self::InvalidPickupCode => "INVALID_PICKUP_CODE",
            Self::Conflict(_) => "CONFLICT",
            Self::Forbidden => "FORBIDDEN",
            Self::Internal(_) => "INTERNAL",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_)
            | Self::RestaurantInactive
            | Self::DishUnavailable(_)
            | Self::InvalidPickupCode => StatusCode::BAD_REQUEST,
            Self::RestaurantNotFound | Self::DishNotFound | Self::OrderNotFound => {
                StatusCode::NOT_FOUND
            }
            Self::InvalidTransition { .. } | Self::StatusConflict | Self::Conflict(_) => {
                StatusCode::CONFLICT
            }
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for OrdersError {
    fn into_response(self) -> Response {
        if let Self::Internal(ref e) = self {
            tracing::error!(error = ?e, kind = "INTERNAL", "internal error");
        }
        error_response(self.status(), self.kind(), &self.to_string())
    }
}
