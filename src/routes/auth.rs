/// Authentication Routes
///
/// Sign-up, sign-in and token refresh. Every successful call returns a fresh
/// token pair and sets the refresh token as the `rt` cookie.

use actix_web::cookie::{time::Duration, Cookie, SameSite};
use actix_web::{web, HttpRequest, HttpResponse, HttpResponseBuilder};

use crate::controller::{AccountController, AuthResponse, RefreshRequest, SignInRequest, SignUpRequest};
use crate::error::{AppError, ErrorContext};

/// Name of the refresh token cookie
pub const REFRESH_COOKIE: &str = "rt";

fn refresh_cookie(token: &str, max_age_seconds: i64) -> Cookie<'static> {
    Cookie::build(REFRESH_COOKIE, token.to_string())
        .path("/auth")
        .http_only(true)
        .secure(true)
        .same_site(SameSite::Strict)
        .max_age(Duration::seconds(max_age_seconds))
        .finish()
}

/// POST /auth/signup
///
/// # Errors
/// - 400: Validation errors (invalid email/password/name)
/// - 409: Email already registered
/// - 500: Internal server error
pub async fn sign_up(
    form: web::Json<SignUpRequest>,
    controller: web::Data<AccountController>,
) -> Result<HttpResponse, AppError> {
    let context = ErrorContext::new("sign_up");

    let response = controller.sign_up(form.into_inner()).await?;

    tracing::info!(
        request_id = %context.request_id,
        account_id = %response.account.id,
        "Account signed up"
    );

    Ok(with_refresh_cookie(HttpResponse::Created(), &controller, response))
}

/// POST /auth/signin
///
/// Unknown email, wrong password and inactive account all answer with the
/// same 401 body.
pub async fn sign_in(
    form: web::Json<SignInRequest>,
    controller: web::Data<AccountController>,
) -> Result<HttpResponse, AppError> {
    let context = ErrorContext::new("sign_in");

    let response = controller.sign_in(form.into_inner()).await?;

    tracing::info!(
        request_id = %context.request_id,
        account_id = %response.account.id,
        "Account signed in"
    );

    Ok(with_refresh_cookie(HttpResponse::Ok(), &controller, response))
}

/// POST /auth/refresh
///
/// Takes the refresh token from the JSON body, falling back to the `rt`
/// cookie.
///
/// # Errors
/// - 401: Missing, invalid or expired refresh token, or inactive account
pub async fn refresh(
    req: HttpRequest,
    body: Option<web::Json<RefreshRequest>>,
    controller: web::Data<AccountController>,
) -> Result<HttpResponse, AppError> {
    let context = ErrorContext::new("refresh");

    let token = body
        .and_then(|b| b.into_inner().refresh_token)
        .filter(|t| !t.is_empty())
        .or_else(|| req.cookie(REFRESH_COOKIE).map(|c| c.value().to_string()))
        .ok_or(AppError::MissingToken)?;

    let response = controller.refresh(&token).await?;

    tracing::info!(
        request_id = %context.request_id,
        account_id = %response.account.id,
        "Token pair refreshed"
    );

    Ok(with_refresh_cookie(HttpResponse::Ok(), &controller, response))
}

fn with_refresh_cookie(
    mut builder: HttpResponseBuilder,
    controller: &AccountController,
    response: AuthResponse,
) -> HttpResponse {
    let cookie = refresh_cookie(&response.refresh_token, controller.signer().refresh_expiry());
    builder.cookie(cookie).json(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refresh_cookie_is_scoped_and_hidden_from_scripts() {
        let cookie = refresh_cookie("token-value", 9000);

        assert_eq!(cookie.name(), "rt");
        assert_eq!(cookie.value(), "token-value");
        assert_eq!(cookie.path(), Some("/auth"));
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.max_age(), Some(Duration::seconds(9000)));
    }
}
