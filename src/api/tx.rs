use actix_web::{HttpResponse, Responder, get, post, web};
use log::{debug, warn};

use super::models::{MessageResponse, NewTxRequest, PendingResponse};
use crate::node::Node;

/// Queue a transaction for the next mined block. No balance or signature
/// checks are made.
#[post("/transactions/new")]
pub async fn post_transaction(
    state: web::Data<Node>,
    body: web::Json<NewTxRequest>,
) -> impl Responder {
    let NewTxRequest {
        sender: Some(sender),
        recipient: Some(recipient),
        amount: Some(amount),
    } = body.into_inner()
    else {
        warn!("POST /transactions/new - rejected: missing fields");
        return HttpResponse::BadRequest().body("Missing values");
    };

    let index = state.new_transaction(&sender, &recipient, amount);
    debug!("POST /transactions/new - {sender} -> {recipient} ({amount}) queued for block {index}");

    HttpResponse::Created().json(MessageResponse {
        message: format!("Transaction will be added to Block {index}"),
    })
}

/// List the pool of transactions not yet in a block.
#[get("/transactions/pending")]
pub async fn get_pending(state: web::Data<Node>) -> impl Responder {
    let pending = state.pending();
    HttpResponse::Ok().json(PendingResponse {
        size: pending.len(),
        transactions: pending,
    })
}
