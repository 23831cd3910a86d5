use axum::{
    body::Bytes,
    extract::State,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use metrics::counter;

use acctsvc_core::command::CreateAccountRequest;

use crate::envelope::{ErrorEnvelope, SuccessEnvelope};
use crate::router::AppState;

/// Routes for the account module, mounted under the versioned API group.
pub fn routes() -> Router<AppState> {
    Router::new().route("/accounts", post(create))
}

/// `POST /accounts`: bind the JSON body, run the create command, wrap the
/// result in the response envelope.
async fn create(State(state): State<AppState>, body: Bytes) -> Response {
    let request: CreateAccountRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(err) => {
            counter!("api_requests_total", "route" => "create_account", "result" => "bad_request")
                .increment(1);
            return ErrorEnvelope::unstructured(format!("invalid request body: {err}"))
                .into_response();
        }
    };

    match state.commands().create_account.handle(request).await {
        Ok(response) => {
            counter!("accounts_created_total").increment(1);
            counter!("api_requests_total", "route" => "create_account", "result" => "ok")
                .increment(1);
            SuccessEnvelope(response).into_response()
        }
        Err(err) => {
            counter!("api_requests_total", "route" => "create_account", "result" => "error")
                .increment(1);
            ErrorEnvelope::from_app_error(&err, state.environment().is_development())
                .into_response()
        }
    }
}
