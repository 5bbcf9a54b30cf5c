use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    wordrank_cli::main_entry().await
}
