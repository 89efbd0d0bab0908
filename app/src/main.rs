#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tonswap_lib::init_tracing();
    tonswap_lib::run().await
}
