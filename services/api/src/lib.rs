mod check;
mod cli;
mod infra;
mod routes;
mod server;

use use_of_force::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
