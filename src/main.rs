use battleship_server::{init_logging, listener, DEFAULT_BIND};
use clap::Parser;

/// Two-player battleship server speaking a line-oriented text protocol.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Address to listen on.
    #[arg(long, default_value = DEFAULT_BIND)]
    bind: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();
    listener::run(&cli.bind).await
}
