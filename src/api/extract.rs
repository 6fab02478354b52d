use axum::extract::{FromRequest, FromRequestParts};

use crate::error::AppError;

/// `axum::Json`, but a rejected body becomes an `AppError` (400 with the
/// usual error payload).
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

/// `axum::extract::Path` with the same rejection mapping.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct ApiPath<T>(pub T);
