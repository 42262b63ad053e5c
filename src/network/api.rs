//! HTTP API of a ledger node
//!
//! Routes:
//! - `GET  /mine`              forge a block
//! - `POST /transactions/new`  queue a transaction
//! - `GET  /chain`             full chain and its length
//! - `POST /nodes/register`    add peers
//! - `GET  /nodes/resolve`     run longest-valid-chain consensus

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;

use crate::consensus::ReportedChain;
use crate::core::Transaction;
use crate::network::Node;

/// API error, rendered as `{"error": ...}`
#[derive(Debug)]
pub enum ApiError {
    InvalidInput(String),
    InternalError(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::InternalError(msg) => {
                log::error!("Request failed: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::InvalidInput(rejection.body_text())
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

// Request/Response Types

/// Every field is optional so a missing one can be reported as such
#[derive(Deserialize)]
pub struct TransactionRequest {
    pub sender: Option<String>,
    pub recipient: Option<String>,
    pub amount: Option<u64>,
}

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub nodes: Option<Vec<String>>,
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Serialize)]
pub struct MineResponse {
    pub message: String,
    pub index: u64,
    pub transactions: Vec<Transaction>,
    pub proof: u64,
    pub previous_hash: String,
}

#[derive(Serialize)]
pub struct RegisterResponse {
    pub message: String,
    pub total_nodes: Vec<String>,
}

// Handlers

async fn mine(State(node): State<Arc<Node>>) -> Result<Json<MineResponse>, ApiError> {
    let block = node.mine().await.map_err(ApiError::InternalError)?;

    Ok(Json(MineResponse {
        message: "New Block Forged".to_string(),
        index: block.index,
        transactions: block.transactions,
        proof: block.proof,
        previous_hash: block.previous_hash,
    }))
}

async fn new_transaction(
    State(node): State<Arc<Node>>,
    payload: Result<Json<TransactionRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let Json(request) = payload?;

    let (Some(sender), Some(recipient), Some(amount)) =
        (request.sender, request.recipient, request.amount)
    else {
        return Err(ApiError::InvalidInput("Missing values".to_string()));
    };

    let index = node.submit_transaction(sender, recipient, amount).await;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: format!("Transaction will be added to Block {}", index),
        }),
    ))
}

async fn full_chain(State(node): State<Arc<Node>>) -> Json<ReportedChain> {
    Json(ReportedChain::new(node.chain().await))
}

async fn register_nodes(
    State(node): State<Arc<Node>>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<RegisterResponse>), ApiError> {
    let Json(request) = payload?;

    let nodes = match request.nodes {
        Some(nodes) if !nodes.is_empty() => nodes,
        _ => {
            return Err(ApiError::InvalidInput(
                "Error: Please supply a valid list of nodes".to_string(),
            ));
        }
    };

    let total_nodes = node
        .register_peers(nodes.as_slice())
        .await
        .map_err(ApiError::InvalidInput)?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "New nodes have been added".to_string(),
            total_nodes,
        }),
    ))
}

async fn consensus(State(node): State<Arc<Node>>) -> Result<Json<serde_json::Value>, ApiError> {
    let resolution = node.resolve().await.map_err(ApiError::InternalError)?;

    let body = if resolution.replaced {
        json!({
            "message": "Our chain was replaced",
            "new_chain": resolution.chain,
        })
    } else {
        json!({
            "message": "Our chain is authoritative",
            "chain": resolution.chain,
        })
    };

    Ok(Json(body))
}

/// Build the router for a node
pub fn build_router(node: Arc<Node>) -> Router {
    Router::new()
        .route("/mine", get(mine))
        .route("/transactions/new", post(new_transaction))
        .route("/chain", get(full_chain))
        .route("/nodes/register", post(register_nodes))
        .route("/nodes/resolve", get(consensus))
        .with_state(node)
}

/// Serve the API until the process is stopped
pub async fn serve(node: Arc<Node>, addr: SocketAddr) -> Result<(), String> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| format!("Failed to bind {}: {}", addr, e))?;

    log::info!("Node {} listening on http://{}", node.node_id(), addr);

    axum::serve(listener, build_router(node))
        .await
        .map_err(|e| format!("Server error: {}", e))
}
