use clap::{Parser, Subcommand};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "site-cli")]
#[command(about = "Command-line client for the site backend", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    /// API path prefix configured on the server
    #[arg(long, default_value = "/api")]
    api_prefix: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check the server is up
    Health,
    /// Show the business identity
    Site,
    /// List booking form options
    Options,
    /// Ask the knowledge-base assistant a question
    Ask {
        /// The question text
        question: Vec<String>,
    },
    /// Print robots.txt
    Robots,
    /// Print sitemap.xml
    Sitemap,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');
    let api = format!("{}{}", base, cli.api_prefix.trim_end_matches('/'));

    match cli.command {
        Commands::Health => {
            let res = client.get(format!("{}/health", base)).send().await?;
            print_json(res).await?;
        }
        Commands::Site => {
            let res = client.get(format!("{}/site", api)).send().await?;
            print_json(res).await?;
        }
        Commands::Options => {
            let res = client.get(format!("{}/booking/options", api)).send().await?;
            print_json(res).await?;
        }
        Commands::Ask { question } => {
            let res = client
                .get(format!("{}/assistant", api))
                .query(&[("q", question.join(" "))])
                .send()
                .await?;
            print_json(res).await?;
        }
        Commands::Robots => {
            let res = client.get(format!("{}/robots.txt", base)).send().await?;
            print_text(res).await?;
        }
        Commands::Sitemap => {
            let res = client.get(format!("{}/sitemap.xml", base)).send().await?;
            print_text(res).await?;
        }
    }

    Ok(())
}

async fn print_json(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let json: Value = res.json().await?;
    if !status.is_success() {
        eprintln!("Error: server returned status {}", status);
    }
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}

async fn print_text(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;
    if !status.is_success() {
        eprintln!("Error: server returned status {}", status);
    }
    print!("{}", text);
    Ok(())
}
