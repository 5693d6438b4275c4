use clap::{Parser, Subcommand};
use std::net::IpAddr;

use rentbuy::console::{self, RunArgs};

#[derive(Parser, Debug)]
#[command(name = "rentbuy", about = "Compare buying a home against renting over a fixed horizon")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the JSON simulation API.
    Serve {
        #[arg(long, env = "RENTBUY_PORT", default_value_t = 8080)]
        port: u16,
        #[arg(long, default_value = "0.0.0.0")]
        host: IpAddr,
    },
    /// Run one scenario and print the report.
    Run(RunArgs),
}

#[tokio::main]
async fn main() {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Serve { port, host } => {
            if let Err(e) = rentbuy::api::run_http_server(host, port).await {
                eprintln!("Server error: {e}");
                std::process::exit(1);
            }
        }
        Command::Run(args) => {
            if let Err(e) = console::run(&args) {
                eprintln!("Error: {e:#}");
                std::process::exit(1);
            }
        }
    }
}
