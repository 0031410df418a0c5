use actix_web::error::{ErrorInternalServerError, ErrorUnauthorized};
use actix_web::{dev::Payload, web, Error, FromRequest, HttpRequest};
use futures::future::{ready, Ready};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use log::debug;
use uuid::Uuid;

use crate::config::AppConfig;
use crate::models::user::JwtClaims;

/// The caller behind a verified bearer token. Handlers take this (or
/// `Option<Self>` where anonymous access is allowed) and pass `user_id` on
/// explicitly; nothing below the handlers reads ambient auth state.
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub email: Option<String>,
}

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = Ready<Result<AuthenticatedUser, Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let auth_header = match req.headers().get("Authorization") {
            Some(header) => match header.to_str() {
                Ok(h) => h,
                Err(_) => return ready(Err(ErrorUnauthorized("Invalid header format"))),
            },
            None => return ready(Err(ErrorUnauthorized("Missing Authorization header"))),
        };

        if !auth_header.starts_with("Bearer ") {
            return ready(Err(ErrorUnauthorized("Invalid auth header format")));
        }
        let token = auth_header.trim_start_matches("Bearer ").trim();

        let config = match req.app_data::<web::Data<AppConfig>>() {
            Some(config) => config,
            None => return ready(Err(ErrorInternalServerError("auth config missing"))),
        };

        match decode_user(token, &config.supabase_jwt_secret) {
            Ok(user) => ready(Ok(user)),
            Err(reason) => {
                debug!("rejected bearer token: {}", reason);
                ready(Err(ErrorUnauthorized("Invalid token")))
            }
        }
    }
}

/// Verifies the token signature against the project's JWT secret and pulls
/// the caller identity out of the claims.
fn decode_user(token: &str, secret: &str) -> Result<AuthenticatedUser, String> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_audience(&["authenticated"]);

    let data = decode::<JwtClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| e.to_string())?;

    let user_id =
        Uuid::parse_str(&data.claims.sub).map_err(|e| format!("invalid sub claim: {}", e))?;
    Ok(AuthenticatedUser {
        user_id,
        email: data.claims.email,
    })
}
