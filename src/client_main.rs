use clap::Parser;
use dotenv::dotenv;
use shopchat::cli::ClientArgs;
use shopchat::client::run_chat_loop;
use std::error::Error;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = ClientArgs::parse();

    run_chat_loop(args).await
}
