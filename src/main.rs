#[tokio::main]
async fn main() -> anyhow::Result<()> {
    shelf_api::bootstrap::run().await
}
