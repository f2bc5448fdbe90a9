// http server mode - the api surface the chat front-end talks to

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::error;

use crate::core::{ColumnInfo, QueryResult};
use crate::{Error, Store, Summary, Validation, data_summary};

struct AppState {
    store: Store,
}

#[derive(Deserialize)]
struct SqlRequest {
    sql: String,
}

#[derive(Serialize)]
struct QueryResponse {
    sql: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<QueryResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    suggestion: Option<String>,
}

#[derive(Serialize)]
struct ValidateResponse {
    valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    suggestion: Option<String>,
}

#[derive(Serialize)]
struct SchemaResponse {
    columns: Vec<ColumnInfo>,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
}

pub struct Server;

impl Server {
    /// Build the router over an already-connected store. Split out from
    /// [`run`](Self::run) so tests can drive the routes without a listener.
    pub fn router(store: Store) -> Router {
        let state = Arc::new(AppState { store });

        Router::new()
            .route("/health", get(health))
            .route("/schema", get(get_schema))
            .route("/summary", get(get_summary))
            .route("/validate", post(validate))
            .route("/query", post(query))
            .layer(CorsLayer::permissive())
            .with_state(state)
    }

    pub async fn run(db_url: &str, host: &str, port: u16) -> Result<(), Error> {
        let store = Store::connect(db_url).await?;
        let app = Self::router(store);

        let addr = format!("{host}:{port}");
        println!("server running at http://{addr}");

        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| Error::Server(e.to_string()))?;

        axum::serve(listener, app)
            .await
            .map_err(|e| Error::Server(e.to_string()))?;

        Ok(())
    }
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

async fn get_schema(
    State(state): State<Arc<AppState>>,
) -> Result<Json<SchemaResponse>, (StatusCode, Json<ErrorResponse>)> {
    match state.store.schema().await {
        Ok(columns) => Ok(Json(SchemaResponse { columns })),
        Err(e) => {
            error!("schema introspection failed: {e}");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: e.to_string(),
                }),
            ))
        }
    }
}

async fn get_summary(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Summary>, (StatusCode, Json<ErrorResponse>)> {
    match data_summary(&state.store).await {
        Ok(summary) => Ok(Json(summary)),
        // already logged where it happened, just translate for the caller
        Err(e) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: e.to_string(),
            }),
        )),
    }
}

async fn validate(Json(req): Json<SqlRequest>) -> Json<ValidateResponse> {
    match Validation::check(&req.sql) {
        Validation::Valid { .. } => Json(ValidateResponse {
            valid: true,
            reason: None,
            suggestion: None,
        }),
        Validation::Invalid { reason, suggestion } => Json(ValidateResponse {
            valid: false,
            reason: Some(reason),
            suggestion: Some(suggestion),
        }),
    }
}

async fn query(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SqlRequest>,
) -> (StatusCode, Json<QueryResponse>) {
    // the gate runs before the store ever sees the string
    let query = match Validation::check(&req.sql) {
        Validation::Valid { query } => query,
        Validation::Invalid { reason, suggestion } => {
            return (
                StatusCode::BAD_REQUEST,
                Json(QueryResponse {
                    sql: req.sql,
                    result: None,
                    error: Some(reason),
                    suggestion: Some(suggestion),
                }),
            );
        }
    };

    match state.store.execute(&query).await {
        Ok(result) => (
            StatusCode::OK,
            Json(QueryResponse {
                sql: query,
                result: Some(result),
                error: None,
                suggestion: None,
            }),
        ),
        Err(e) => {
            error!("query execution failed: {e}");
            (
                StatusCode::BAD_REQUEST,
                Json(QueryResponse {
                    sql: query,
                    result: None,
                    error: Some(e.to_string()),
                    suggestion: None,
                }),
            )
        }
    }
}
