#[tokio::main]
async fn main() {
    cookclub_backend::run().await;
}
