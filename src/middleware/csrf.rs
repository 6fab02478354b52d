//! Anti-forgery tokens.
//!
//! Tokens are stateless: `<nonce>.<hex hmac-sha256(secret, nonce)>`. Any response
//! carries a fresh one in `X-CSRF-Token`; state-changing requests to paths
//! that are not exempt must send one back.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::{HeaderName, HeaderValue, Method};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use tracing::warn;
use uuid::Uuid;

use crate::error::AppError;

type HmacSha256 = Hmac<Sha256>;

pub const CSRF_HEADER: HeaderName = HeaderName::from_static("x-csrf-token");

#[derive(Debug, Clone)]
pub struct CsrfConfig {
    pub enabled: bool,
    pub secret: String,
    /// Path prefixes that skip the check.
    pub exempt_paths: Vec<String>,
}

impl CsrfConfig {
    pub fn issue_token(&self) -> String {
        let nonce = Uuid::new_v4().simple().to_string();
        let signature = hex::encode(self.mac(&nonce).finalize().into_bytes());
        format!("{}.{}", nonce, signature)
    }

    /// Signature comparison is constant-time.
    pub fn verify_token(&self, token: &str) -> bool {
        let Some((nonce, signature)) = token.split_once('.') else {
            return false;
        };
        if nonce.is_empty() {
            return false;
        }
        match hex::decode(signature) {
            Ok(provided) => self.mac(nonce).verify_slice(&provided).is_ok(),
            Err(_) => false,
        }
    }

    pub fn is_exempt(&self, path: &str) -> bool {
        self.exempt_paths.iter().any(|prefix| {
            let prefix = prefix.trim_end_matches('/');
            path == prefix
                || path
                    .strip_prefix(prefix)
                    .is_some_and(|rest| rest.starts_with('/'))
        })
    }

    fn mac(&self, nonce: &str) -> HmacSha256 {
        let mut mac = HmacSha256::new_from_slice(self.secret.as_bytes())
            .expect("HMAC accepts any key length");
        mac.update(nonce.as_bytes());
        mac
    }
}

fn is_state_changing(method: &Method) -> bool {
    [Method::POST, Method::PUT, Method::PATCH, Method::DELETE].contains(method)
}

pub async fn csrf_protect(
    State(csrf): State<Arc<CsrfConfig>>,
    request: Request,
    next: Next,
) -> Response {
    if csrf.enabled
        && is_state_changing(request.method())
        && !csrf.is_exempt(request.uri().path())
    {
        let valid = request
            .headers()
            .get(&CSRF_HEADER)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|token| csrf.verify_token(token));

        if !valid {
            warn!(
                method = %request.method(),
                path = %request.uri().path(),
                "rejected request without a valid CSRF token"
            );
            let response =
                AppError::BadRequest("CSRF token missing or invalid".to_string()).into_response();
            return with_fresh_token(&csrf, response);
        }
    }

    let response = next.run(request).await;
    with_fresh_token(&csrf, response)
}

fn with_fresh_token(csrf: &CsrfConfig, mut response: Response) -> Response {
    if let Ok(value) = HeaderValue::from_str(&csrf.issue_token()) {
        response.headers_mut().insert(CSRF_HEADER, value);
    }
    response
}
