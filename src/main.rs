/*
 * Responsibility
 * - tokio runtime
 * - app::run() (no logic here)
 */
use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    request_context::app::run().await
}
