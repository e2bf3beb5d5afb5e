use actix_web::{HttpResponse, get, web};
use serde_json::json;

use crate::{AppState, error::AppError, ws};

pub fn register(cfg: &mut web::ServiceConfig) {
    cfg.service(health)
        .service(
            web::scope("/api")
                .service(list_files)
                .service(get_file)
                .service(get_asset),
        )
        .route("/ws", web::get().to(ws::ws_handler));
}

#[get("/healthz")]
async fn health() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "status": "ok",
        "service": "mdview",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

#[get("/files")]
async fn list_files(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let tree = state.service.list_tree()?;
    Ok(HttpResponse::Ok().json(tree))
}

#[get("/file/{path:.*}")]
async fn get_file(
    path: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let relative = path.into_inner();
    let document = state.service.get_document(&relative).await?;
    Ok(HttpResponse::Ok().json(document))
}

#[get("/asset/{path:.*}")]
async fn get_asset(
    path: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let relative = path.into_inner();
    let bytes = state.service.get_asset(&relative).await?;
    Ok(HttpResponse::Ok()
        .content_type(mime_for_path(&relative))
        .body(bytes))
}

/// Content type for asset responses, derived from the file extension.
fn mime_for_path(path: &str) -> &'static str {
    let ext = path.rsplit('.').next().unwrap_or("").to_ascii_lowercase();
    match ext.as_str() {
        "png" => "image/png",
        "svg" => "image/svg+xml",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        _ => "application/octet-stream",
    }
}
