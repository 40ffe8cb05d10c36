use actix_web::{App, HttpServer, web};
use dotenvy::dotenv;
use log::{info, warn};

use pow_ledger_node::api;
use pow_ledger_node::blockchain::Ledger;
use pow_ledger_node::config::Config;
use pow_ledger_node::network::HttpChainFetcher;
use pow_ledger_node::node::Node;

fn main() -> std::io::Result<()> {
    let _ = dotenv();
    env_logger::init();

    let config = Config::from_env();

    // The blocking HTTP client has to exist before the async runtime starts.
    let fetcher = HttpChainFetcher::new(config.peer_scheme.clone(), config.peer_timeout)
        .map_err(std::io::Error::other)?;
    let node = Node::new(config.node_id.clone(), Ledger::new(), Box::new(fetcher));
    for peer in &config.peers {
        if let Err(e) = node.register_peer(peer) {
            warn!("ignoring configured peer: {e}");
        }
    }

    println!(
        "⛓️ Starting ledger node {} at http://{}:{}",
        node.node_id(),
        config.host,
        config.port
    );
    info!("{} peers registered at startup", node.peers().len());

    actix_web::rt::System::new().block_on(serve(config, node))
}

async fn serve(config: Config, node: Node) -> std::io::Result<()> {
    let state = web::Data::new(node);

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .configure(api::init_routes)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
