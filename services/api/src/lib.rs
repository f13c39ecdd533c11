mod cli;
mod demo;
mod infra;
mod menu;
mod routes;
mod server;

use smart_loan::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
