mod cli;
mod infra;
mod routes;
mod server;

use presence_scan::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
