use actix_web::{get, web, HttpResponse};

use crate::dtos::ApiResponse;
use crate::AppState;

/// GET /healthz
/// Liveness plus a cheap reachability probe against the document store.
#[get("/healthz")]
pub async fn healthz(state: web::Data<AppState>) -> HttpResponse {
    let store_reachable = match state
        .http_client
        .get(format!("{}/rest/v1/", state.supabase_url))
        .header("apikey", &state.supabase_anon_key)
        .send()
        .await
    {
        Ok(resp) => resp.status().is_success(),
        Err(_) => false,
    };

    HttpResponse::Ok().json(ApiResponse::ok(
        "ok",
        serde_json::json!({ "store_reachable": store_reachable }),
    ))
}
