mod cli;
mod infra;
mod quote;
mod routes;
mod server;

use buy_my_house::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
