use std::path::PathBuf;
use std::time::Instant;

use clap::{Parser, Subcommand};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "gateway-cli")]
#[command(about = "Operator CLI for the storage gateway", long_about = None)]
struct Cli {
    /// Gateway base URL, route prefix included.
    #[arg(short, long, default_value = "http://localhost:3000/api")]
    url: String,

    /// Owner the listings and uploads are scoped to.
    #[arg(short, long, default_value = "webmaster")]
    owner: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Probe the listing endpoints and report status and latency
    Probe,
    /// List files, optionally inside a folder
    Files {
        #[arg(long)]
        folder: Option<String>,
    },
    /// List folders, optionally under a parent
    Folders {
        #[arg(long)]
        parent: Option<String>,
    },
    /// List trashed files
    Trash,
    /// Upload one or more files
    Upload {
        #[arg(required = true)]
        files: Vec<PathBuf>,
        #[arg(long)]
        folder: Option<String>,
    },
    /// Download a file
    Download {
        id: String,
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Move a file to the trash, or delete it for good
    Delete {
        id: String,
        #[arg(long)]
        permanent: bool,
    },
    /// Restore a trashed file
    Restore { id: String },
    /// Create a share link for a file
    Share { id: String },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = Client::new();
    let base = cli.url.trim_end_matches('/');
    let owner = [("owner", cli.owner.as_str())];

    match cli.command {
        Commands::Probe => probe(&client, base, &cli.owner).await,
        Commands::Files { folder } => {
            let mut req = client.get(format!("{}/files", base)).query(&owner);
            if let Some(folder) = folder {
                req = req.query(&[("folderId", folder)]);
            }
            print_response(req.send().await?).await
        }
        Commands::Folders { parent } => {
            let mut req = client.get(format!("{}/folders", base)).query(&owner);
            if let Some(parent) = parent {
                req = req.query(&[("parentId", parent)]);
            }
            print_response(req.send().await?).await
        }
        Commands::Trash => {
            let res = client
                .get(format!("{}/files/trash/list", base))
                .query(&owner)
                .send()
                .await?;
            print_response(res).await
        }
        Commands::Upload { files, folder } => {
            let multiple = files.len() > 1;
            let field = if multiple { "files" } else { "file" };
            let mut form = Form::new()
                .percent_encode_noop()
                .text("owner", cli.owner.clone());
            if let Some(folder) = folder {
                form = form.text("folderId", folder);
            }
            for path in files {
                let data = tokio::fs::read(&path).await?;
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| "upload".to_string());
                form = form.part(field, Part::bytes(data).file_name(name));
            }
            let endpoint = if multiple { "files/upload/multiple" } else { "files/upload" };
            let res = client
                .post(format!("{}/{}", base, endpoint))
                .multipart(form)
                .send()
                .await?;
            print_response(res).await
        }
        Commands::Download { id, output } => {
            let res = client.get(format!("{}/files/{}/download", base, id)).send().await?;
            if !res.status().is_success() {
                return print_response(res).await;
            }
            let bytes = res.bytes().await?;
            tokio::fs::write(&output, &bytes).await?;
            println!("Saved {} bytes to {}", bytes.len(), output.display());
            Ok(())
        }
        Commands::Delete { id, permanent } => {
            let url = if permanent {
                format!("{}/files/{}/permanent", base, id)
            } else {
                format!("{}/files/{}", base, id)
            };
            print_response(client.delete(url).send().await?).await
        }
        Commands::Restore { id } => {
            let res = client.put(format!("{}/files/{}/restore", base, id)).send().await?;
            print_response(res).await
        }
        Commands::Share { id } => {
            let res = share_request(&client, base, &id).send().await?;
            print_response(res).await
        }
    }
}

/// Share links are created with an empty JSON object, as the share page does.
fn share_request(client: &Client, base: &str, id: &str) -> RequestBuilder {
    client
        .post(format!("{}/share/files/{}", base, id))
        .json(&serde_json::json!({}))
}

/// Hit each listing endpoint once and report, without stopping on failures.
async fn probe(client: &Client, base: &str, owner: &str) -> Result<(), Box<dyn std::error::Error>> {
    let endpoints = [
        (Method::GET, format!("/files?owner={}", owner)),
        (Method::GET, format!("/folders?owner={}", owner)),
        (Method::GET, format!("/files/trash/list?owner={}", owner)),
    ];

    let mut failures = 0;
    for (method, endpoint) in endpoints {
        let start = Instant::now();
        let result = client
            .request(method.clone(), format!("{}{}", base, endpoint))
            .send()
            .await;
        let elapsed = start.elapsed().as_millis();

        match result {
            Ok(res) if res.status().is_success() => {
                println!("ok    {:<6} {:<40} {} ({} ms)", method.as_str(), endpoint, res.status(), elapsed);
            }
            Ok(res) => {
                failures += 1;
                println!("error {:<6} {:<40} {} ({} ms)", method.as_str(), endpoint, res.status(), elapsed);
            }
            Err(e) => {
                failures += 1;
                println!("error {:<6} {:<40} {}", method.as_str(), endpoint, e);
            }
        }
    }

    if failures > 0 {
        eprintln!("{} endpoint(s) failed", failures);
    }
    Ok(())
}

async fn print_response(res: Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: gateway returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let text = res.text().await?;
    match serde_json::from_str::<Value>(&text) {
        Ok(json) => println!("{}", serde_json::to_string_pretty(&json)?),
        Err(_) => println!("{}", text),
    }
    Ok(())
}
