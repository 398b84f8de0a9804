#[tokio::main]
async fn main() {
    if let Err(error) = tgtapper::run().await {
        tracing::error!("Fatal: {}", error);
        std::process::exit(1);
    }
}
