#[cfg(feature = "http_api")]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use std::net::SocketAddr;

    use workflow_cpm::{http_api, logging};

    logging::init_logging(None);

    let addr: SocketAddr = std::env::var("WORKFLOW_CPM_HTTP_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:3000".to_string())
        .parse()?;

    println!("workflow-cpm HTTP API listening on http://{addr}");
    http_api::serve(addr, None).await?;
    Ok(())
}

#[cfg(not(feature = "http_api"))]
fn main() {
    eprintln!("Rebuild with the `http_api` feature to enable the HTTP server.");
}
