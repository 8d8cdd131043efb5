/// Account Routes
///
/// Everything here sits behind the JWT middleware; the caller's identity is
/// read from request extensions.

use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::account::AccountIdentity;
use crate::controller::{AccountController, ChangeStatusRequest};
use crate::error::{AppError, ErrorContext};

#[derive(Deserialize)]
pub struct EmailQuery {
    pub email: String,
}

/// GET /api/me
pub async fn current_account(
    identity: web::ReqData<AccountIdentity>,
    controller: web::Data<AccountController>,
) -> Result<HttpResponse, AppError> {
    let account = controller.current_account(&identity).await?;
    Ok(HttpResponse::Ok().json(account))
}

/// GET /api/accounts?email=
pub async fn get_account_by_email(
    query: web::Query<EmailQuery>,
    controller: web::Data<AccountController>,
) -> Result<HttpResponse, AppError> {
    let account = controller.get_by_email(&query.email).await?;
    Ok(HttpResponse::Ok().json(account))
}

/// GET /api/accounts/{id}
pub async fn get_account_by_id(
    path: web::Path<String>,
    controller: web::Data<AccountController>,
) -> Result<HttpResponse, AppError> {
    let account = controller.get_by_uuid(&path).await?;
    Ok(HttpResponse::Ok().json(account))
}

/// PATCH /api/accounts/{id}/status
///
/// # Errors
/// - 400: Malformed id or unknown status
/// - 404: No account with that id
pub async fn change_account_status(
    identity: web::ReqData<AccountIdentity>,
    path: web::Path<String>,
    form: web::Json<ChangeStatusRequest>,
    controller: web::Data<AccountController>,
) -> Result<HttpResponse, AppError> {
    let context = ErrorContext::new("change_account_status").with_account_id(identity.id);
    let target = path.into_inner();
    let status = form.status.clone();

    controller.change_status(&target, form.into_inner()).await?;

    tracing::info!(
        request_id = %context.request_id,
        changed_by = ?context.account_id,
        target = %target,
        status = %status,
        "Account status changed"
    );

    Ok(HttpResponse::NoContent().finish())
}
