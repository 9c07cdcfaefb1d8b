use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    wordhash_cli::main_entry().await
}
