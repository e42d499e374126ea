#[tokio::main]
async fn main() {
    plainmed::start_server().await;
}
