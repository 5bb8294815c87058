//! Request ID middleware helpers.
//!
//! Stack [`set_request_id_layer`] outermost, then [`propagate_request_id_layer`],
//! both outside [`crate::RequestLoggingLayer`] so the request span records the
//! id under [`crate::HEADER_REQUEST_ID`].

use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};

/// Layer generating a UUID request id when the request carries none.
#[must_use]
pub fn set_request_id_layer() -> SetRequestIdLayer<MakeRequestUuid> {
    SetRequestIdLayer::x_request_id(MakeRequestUuid)
}

/// Layer copying the request id onto the response.
#[must_use]
pub fn propagate_request_id_layer() -> PropagateRequestIdLayer {
    PropagateRequestIdLayer::x_request_id()
}
