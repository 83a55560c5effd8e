//! Thin Axum transport for the four operations in the core API surface.
//!
//! This module is the "external collaborator" the booking core
//! declares out of scope for its own correctness requirements: it owns
//! no locks and no business logic, it only parses requests, calls into
//! `BookingStore`, and maps the result onto the status codes below.

use std::collections::HashSet;
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;

use crate::core::{BookingOutcome, BookingStore};
use crate::error::Error;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<BookingStore>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/movies", get(list_movies))
        .route("/movies/:movie_id/theaters", get(list_theaters_for_movie))
        .route("/movies/:movie_id/theaters/:theater_id/seats", get(list_available_seats))
        .route("/movies/:movie_id/theaters/:theater_id/book", post(book))
        .with_state(state)
}

/// Wraps a core `Error` so it can be returned directly from a handler;
/// maps to INVALID_REQ (400) per the core API surface table, since every
/// `Error` variant the core can raise is a malformed/unknown-id request.
struct ApiError(Error);

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (StatusCode::BAD_REQUEST, self.0.to_string()).into_response()
    }
}

async fn list_movies(State(state): State<AppState>) -> impl IntoResponse {
    (StatusCode::OK, rendered_body(state.store.list_movies()))
}

async fn list_theaters_for_movie(State(state): State<AppState>, Path(movie_id): Path<u64>) -> Result<impl IntoResponse, ApiError> {
    let listing = state.store.list_theaters_for_movie(movie_id)?;
    Ok((StatusCode::OK, rendered_body(listing)))
}

async fn list_available_seats(State(state): State<AppState>, Path((movie_id, theater_id)): Path<(u64, u64)>) -> Result<impl IntoResponse, ApiError> {
    let listing = state.store.list_available_seats(movie_id, theater_id)?;
    Ok((StatusCode::OK, rendered_body(listing)))
}

#[derive(Debug, Deserialize)]
struct BookRequest {
    seats: Vec<u32>,
}

async fn book(
    State(state): State<AppState>,
    Path((movie_id, theater_id)): Path<(u64, u64)>,
    Json(body): Json<BookRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let seats: HashSet<u32> = body.seats.into_iter().collect();
    let outcome = state.store.book(movie_id, theater_id, seats)?;

    match outcome {
        BookingOutcome::Accepted => Ok((StatusCode::OK, "Booking OK\r\n")),
        BookingOutcome::NotAvailable => Ok((StatusCode::FORBIDDEN, "")),
        BookingOutcome::Invalid => Ok((StatusCode::BAD_REQUEST, "")),
    }
}

fn rendered_body(listing: Arc<str>) -> String {
    listing.to_string()
}
