use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "gateway-cli")]
#[command(about = "Operator CLI for the inventory gateway", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check stock through the sync (retry) path
    Sync {
        /// Product id
        id: String,
    },
    /// Check stock through the async (time-limited) path
    Async {
        /// Product id
        id: String,
    },
    /// Fire repeated calls to drive the breaker by hand
    Storm {
        /// Product id
        id: String,
        /// Number of calls to fire
        #[arg(short, long, default_value_t = 10)]
        count: u32,
        /// Which path to storm: sync or async
        #[arg(short, long, default_value = "async")]
        path: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    match cli.command {
        Commands::Sync { id } => {
            let body = check_stock(&client, &cli.url, &id, "sync").await?;
            println!("{}", body);
        }
        Commands::Async { id } => {
            let body = check_stock(&client, &cli.url, &id, "async").await?;
            println!("{}", body);
        }
        Commands::Storm { id, count, path } => {
            if path != "sync" && path != "async" {
                eprintln!("Error: --path must be 'sync' or 'async'");
                return Ok(());
            }
            for n in 1..=count {
                match check_stock(&client, &cli.url, &id, &path).await {
                    Ok(body) => println!("[{n:>3}] {body}"),
                    Err(e) => println!("[{n:>3}] request failed: {e}"),
                }
            }
        }
    }

    Ok(())
}

async fn check_stock(
    client: &reqwest::Client,
    base: &str,
    id: &str,
    path: &str,
) -> Result<String, reqwest::Error> {
    let res = client
        .get(format!("{base}/api/products/{id}/{path}"))
        .send()
        .await?;
    res.text().await
}
