use actix_web::{HttpResponse, Responder, get, post, web};
use log::{error, info, warn};

use super::models::{RegisterRequest, RegisterResponse, ResolveResponse};
use crate::node::Node;

/// Register a list of peer addresses.
#[post("/nodes/register")]
pub async fn register_nodes(
    state: web::Data<Node>,
    body: web::Json<RegisterRequest>,
) -> impl Responder {
    let Some(nodes) = body.into_inner().nodes else {
        return HttpResponse::BadRequest().body("Error: Please supply a valid list of nodes");
    };

    for address in &nodes {
        if let Err(e) = state.register_peer(address) {
            warn!("POST /nodes/register - {e}");
            return HttpResponse::BadRequest().body(e.to_string());
        }
    }

    let total_nodes = state.peers();
    info!("POST /nodes/register - {} peers known", total_nodes.len());
    HttpResponse::Created().json(RegisterResponse {
        message: "New nodes have been added",
        total_nodes,
    })
}

/// Run one consensus round against every registered peer.
#[get("/nodes/resolve")]
pub async fn consensus(state: web::Data<Node>) -> impl Responder {
    let node = state.clone();
    let replaced = match web::block(move || node.resolve_conflicts()).await {
        Ok(replaced) => replaced,
        Err(e) => {
            error!("GET /nodes/resolve - blocking task failed: {e}");
            return HttpResponse::InternalServerError().body("consensus task failed");
        }
    };

    let chain = state.chain();
    let resp = if replaced {
        ResolveResponse::Replaced {
            message: "Our chain was replaced",
            new_chain: chain,
        }
    } else {
        ResolveResponse::Authoritative {
            message: "Our chain is authoritative",
            chain,
        }
    };
    HttpResponse::Ok().json(resp)
}
