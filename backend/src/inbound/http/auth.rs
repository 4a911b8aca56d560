//! Request gateway: bearer-token authentication and role gating.
//!
//! Handlers take an [`Identity`] argument to require an authenticated caller.
//! The token comes from `Authorization: Bearer <token>` or, failing that, the
//! `token` cookie. Every authentication failure renders the same
//! "Not authorized to access this route" message; the resolver logs the
//! distinct cause.

use actix_web::http::header;
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::LocalBoxFuture;
use tracing::debug;

use crate::domain::{Error, NOT_AUTHORIZED, Role, User, UserId, authorize};
use crate::inbound::http::state::HttpState;

/// Cookie consulted when no bearer header is present.
pub const TOKEN_COOKIE: &str = "token";

const BEARER_PREFIX: &str = "Bearer ";

/// Pull the raw token out of the request, header first.
pub fn extract_token(req: &HttpRequest) -> Option<String> {
    let from_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix(BEARER_PREFIX))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_owned);

    from_header.or_else(|| {
        req.cookie(TOKEN_COOKIE)
            .map(|cookie| cookie.value().to_owned())
            .filter(|token| !token.is_empty())
    })
}

/// Authenticated caller resolved from the request token.
#[derive(Debug, Clone)]
pub struct Identity(User);

impl Identity {
    pub fn user(&self) -> &User {
        &self.0
    }

    pub fn id(&self) -> &UserId {
        &self.0.id
    }

    /// Fail with `403 Forbidden` unless the caller holds one of `allowed`.
    pub fn require_role(&self, allowed: &[Role]) -> Result<(), Error> {
        authorize(&self.0, allowed).map_err(|denied| Error::forbidden(denied.to_string()))
    }

    /// Shorthand for the administrator gate.
    pub fn require_admin(&self) -> Result<(), Error> {
        self.require_role(&[Role::Admin])
    }
}

impl FromRequest for Identity {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let token = extract_token(req);
        let state = req.app_data::<web::Data<HttpState>>().cloned();
        Box::pin(async move {
            let state = state.ok_or_else(|| Error::internal("HTTP state is not configured"))?;
            let Some(token) = token else {
                debug!("request carried no bearer token");
                return Err(Error::unauthorized(NOT_AUTHORIZED).into());
            };
            let user = state.sessions.resolve(&token).await?;
            Ok(Identity(user))
        })
    }
}
