use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "converter-cli")]
#[command(about = "Command line client for the recipe unit converter", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the service manifest
    Manifest,
    /// Print the HTML form page
    Form,
    /// Convert a list of ingredients
    Convert {
        #[arg(long, value_enum)]
        from: System,

        #[arg(long, value_enum)]
        to: System,

        /// Ingredients as a JSON array, e.g. '[{"name":"flour","amount":2,"unit":"cup"}]'
        #[arg(long, conflicts_with = "file", required_unless_present = "file")]
        ingredients: Option<String>,

        /// File holding the ingredients JSON array
        #[arg(long)]
        file: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum System {
    Metric,
    Imperial,
}

impl System {
    fn as_str(self) -> &'static str {
        match self {
            System::Metric => "metric",
            System::Imperial => "imperial",
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    match cli.command {
        Commands::Manifest => {
            let res = client.get(format!("{}/manifest.json", base)).send().await?;
            print_response(res).await?;
        }
        Commands::Form => {
            let res = client.get(format!("{}/", base)).send().await?;
            println!("{}", res.text().await?);
        }
        Commands::Convert {
            from,
            to,
            ingredients,
            file,
        } => {
            let text = match (ingredients, file) {
                (Some(text), _) => text,
                (None, Some(path)) => std::fs::read_to_string(path)?,
                (None, None) => return Err("either --ingredients or --file is required".into()),
            };
            let ingredients: Value = serde_json::from_str(&text)?;

            let body = json!({
                "source_system": from.as_str(),
                "target_system": to.as_str(),
                "ingredients": ingredients,
            });
            let res = client.post(format!("{}/", base)).json(&body).send().await?;
            print_response(res).await?;
        }
    }

    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let json: Value = res.json().await?;

    if !status.is_success() {
        eprintln!("Error: converter returned status {}", status);
    }
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
