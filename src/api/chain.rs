use actix_web::{HttpResponse, Responder, get, web};
use log::{error, warn};

use super::models::MineResponse;
use crate::blockchain::Block;
use crate::error::NodeError;
use crate::network::ChainReport;
use crate::node::Node;

/// Get the full chain. This is the endpoint peers poll during consensus.
#[get("/chain")]
pub async fn get_chain(state: web::Data<Node>) -> impl Responder {
    let chain = state.chain();
    HttpResponse::Ok().json(ChainReport {
        length: chain.len(),
        chain,
    })
}

/// Mine a new block from the current pool plus the mining reward.
/// The proof search is CPU-bound, so it runs on the blocking pool.
#[get("/mine")]
pub async fn mine_block(state: web::Data<Node>) -> impl Responder {
    let node = state.clone();
    match web::block(move || node.mine()).await {
        Ok(result) => mine_response(result),
        Err(e) => {
            error!("GET /mine - blocking task failed: {e}");
            HttpResponse::InternalServerError().body("mining task failed")
        }
    }
}

fn mine_response(result: Result<Block, NodeError>) -> HttpResponse {
    match result {
        Ok(block) => HttpResponse::Ok().json(MineResponse {
            message: "New Block Forged",
            index: block.index,
            transactions: block.transactions,
            proof: block.proof,
            previous_hash: block.previous_hash,
        }),
        Err(e @ NodeError::MiningSuperseded) => {
            warn!("GET /mine - {e}");
            HttpResponse::Conflict().body(e.to_string())
        }
        Err(e) => {
            error!("GET /mine - {e}");
            HttpResponse::InternalServerError().body(e.to_string())
        }
    }
}
