use actix_web::dev::Server;
use actix_web::{web, App, HttpServer};
use std::net::TcpListener;

use crate::controller::AccountController;
use crate::logger::{access_log, LoggerMiddleware};
use crate::middleware::JwtMiddleware;
use crate::routes::{
    change_account_status, current_account, get_account_by_email, get_account_by_id, health_check,
    refresh, sign_in, sign_up, version,
};

pub fn run(listener: TcpListener, controller: AccountController) -> Result<Server, std::io::Error> {
    let signer = controller.signer();
    let controller = web::Data::new(controller);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(access_log())
            .wrap(LoggerMiddleware)
            .app_data(controller.clone())
            // Public routes
            .route("/health_check", web::get().to(health_check))
            .route("/version", web::get().to(version))
            .route("/auth/signup", web::post().to(sign_up))
            .route("/auth/signin", web::post().to(sign_in))
            .route("/auth/refresh", web::post().to(refresh))
            // Bearer access token required
            .service(
                web::scope("/api")
                    .wrap(JwtMiddleware::new(signer.clone()))
                    .route("/me", web::get().to(current_account))
                    .route("/accounts", web::get().to(get_account_by_email))
                    .route("/accounts/{id}", web::get().to(get_account_by_id))
                    .route("/accounts/{id}/status", web::patch().to(change_account_status)),
            )
    })
    .listen(listener)?
    .run();

    Ok(server)
}
