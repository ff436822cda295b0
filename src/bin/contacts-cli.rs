use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "contacts-cli")]
#[command(about = "Command-line client for the contact manager API", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:5000")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List contacts, optionally filtered by a search term
    List {
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Show a single contact
    Get { id: i64 },
    /// Create a contact
    Add(ContactArgs),
    /// Replace every field of a contact (omitted fields become empty)
    Update {
        id: i64,
        #[command(flatten)]
        fields: ContactArgs,
    },
    /// Delete a contact
    Delete { id: i64 },
}

#[derive(Args)]
struct ContactArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    email: Option<String>,
    #[arg(long)]
    phone: Option<String>,
    #[arg(long)]
    address: Option<String>,
    #[arg(long)]
    notes: Option<String>,
}

impl ContactArgs {
    fn to_json(&self) -> Value {
        json!({
            "name": self.name,
            "email": self.email.as_deref().unwrap_or_default(),
            "phone": self.phone.as_deref().unwrap_or_default(),
            "address": self.address.as_deref().unwrap_or_default(),
            "notes": self.notes.as_deref().unwrap_or_default(),
        })
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = format!("{}/api/contacts", cli.url.trim_end_matches('/'));

    let res = match &cli.command {
        Commands::List { search } => {
            let mut req = client.get(&base);
            if let Some(term) = search {
                req = req.query(&[("search", term)]);
            }
            req.send().await?
        }
        Commands::Get { id } => client.get(format!("{base}/{id}")).send().await?,
        Commands::Add(fields) => client.post(&base).json(&fields.to_json()).send().await?,
        Commands::Update { id, fields } => {
            client
                .put(format!("{base}/{id}"))
                .json(&fields.to_json())
                .send()
                .await?
        }
        Commands::Delete { id } => client.delete(format!("{base}/{id}")).send().await?,
    };

    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: API returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(ExitCode::FAILURE);
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(ExitCode::SUCCESS)
}
