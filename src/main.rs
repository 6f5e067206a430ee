#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if !scaffolded::cli::run().await? {
        std::process::exit(1);
    }
    Ok(())
}
