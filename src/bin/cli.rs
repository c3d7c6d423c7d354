//! WarpDeck CLI
//!
//! Command-line client for a running WarpDeck server:
//! - List and inspect dashboards
//! - Add and remove links
//! - Change settings
//! - Export and import data

use clap::{Parser, Subcommand};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde_json::{json, Value};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "warpdeck-cli")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Manage WarpDeck dashboards from the command line")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// API server URL
    #[arg(long, default_value = "http://localhost:8089", global = true)]
    pub api_url: String,

    /// Output format (table, json)
    #[arg(short, long, default_value = "table", global = true)]
    pub format: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show server status
    Status,

    /// List dashboards
    Dashboards,

    /// Show one dashboard and its links
    Show {
        slug: String,
    },

    /// Create a dashboard
    Create {
        title: String,
        slug: String,
    },

    /// Delete a dashboard
    Delete {
        slug: String,
    },

    /// Add a link to a dashboard
    AddLink {
        /// Dashboard slug
        slug: String,
        label: String,
        url: String,
        /// Short description
        #[arg(long)]
        description: Option<String>,
        /// Thumbnail URL (skips favicon download)
        #[arg(long)]
        thumbnail: Option<String>,
        /// Accent color, e.g. "#ff8800"
        #[arg(long)]
        color: Option<String>,
        /// Grid columns to span
        #[arg(long)]
        columns: Option<u32>,
        /// Open in a new tab
        #[arg(long)]
        new_tab: bool,
    },

    /// Remove a link from a dashboard
    RemoveLink {
        slug: String,
        link_id: String,
    },

    /// Re-download favicons for a dashboard
    Refresh {
        slug: String,
    },

    /// Reorder dashboards by id or slug; omitted dashboards drop out of the index
    Reorder {
        dashboards: Vec<String>,
    },

    /// Repair a stale default dashboard
    Repair,

    /// Show settings
    Settings,

    /// Set the default dashboard
    SetDefault {
        slug: String,
    },

    /// Set the theme (dark, light)
    SetTheme {
        theme: String,
    },

    /// Download a zip export
    Export {
        /// Output file
        #[arg(short, long, default_value = "warpdeck-export.zip")]
        output: PathBuf,
    },

    /// Import a dashboard (.json) or a full export (.zip)
    Import {
        path: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let client = Client::new();
    let api = format!("{}/api", cli.api_url.trim_end_matches('/'));
    let as_json = cli.format == "json";

    match cli.command {
        Commands::Status => {
            let response = client.get(format!("{}/health", cli.api_url)).send().await;

            match response {
                Ok(resp) if resp.status().is_success() => {
                    let health: Value = resp.json().await?;
                    if as_json {
                        println!("{}", serde_json::to_string_pretty(&health)?);
                        return Ok(());
                    }

                    println!("WarpDeck v{}", health["version"].as_str().unwrap_or("?"));
                    println!();
                    println!("Status:     {}", health["status"].as_str().unwrap_or("unknown"));
                    println!("Storage:    {}", health["storage"].as_str().unwrap_or("unknown"));
                    println!("Dashboards: {}", health["dashboards"].as_u64().unwrap_or(0));
                    if let Some(uptime) = health["uptime_seconds"].as_u64() {
                        println!("Uptime:     {}", format_duration(uptime));
                    }
                }
                Ok(resp) => {
                    eprintln!("API returned error: {}", resp.status());
                    std::process::exit(1);
                }
                Err(e) => {
                    eprintln!("Cannot connect to WarpDeck at {}", cli.api_url);
                    eprintln!("Error: {}", e);
                    eprintln!();
                    eprintln!("Make sure the server is running:");
                    eprintln!("  cargo run --bin warpdeck");
                    std::process::exit(1);
                }
            }
        }

        Commands::Dashboards => {
            let dashboards = expect_json(client.get(format!("{}/dashboards", api)).send().await?).await?;
            if as_json {
                println!("{}", serde_json::to_string_pretty(&dashboards)?);
            } else {
                print_dashboards(&dashboards);
            }
        }

        Commands::Show { slug } => {
            let dashboard =
                expect_json(client.get(format!("{}/dashboards/{}", api, slug)).send().await?).await?;
            if as_json {
                println!("{}", serde_json::to_string_pretty(&dashboard)?);
            } else {
                print_dashboard(&dashboard);
            }
        }

        Commands::Create { title, slug } => {
            let body = json!({ "title": title, "slug": slug });
            let dashboard =
                expect_json(client.post(format!("{}/dashboards", api)).json(&body).send().await?).await?;
            println!(
                "Created dashboard {} ({})",
                dashboard["slug"].as_str().unwrap_or("-"),
                dashboard["id"].as_str().unwrap_or("-")
            );
        }

        Commands::Delete { slug } => {
            expect_json(client.delete(format!("{}/dashboards/{}", api, slug)).send().await?).await?;
            println!("Deleted dashboard {}", slug);
        }

        Commands::AddLink {
            slug,
            label,
            url,
            description,
            thumbnail,
            color,
            columns,
            new_tab,
        } => {
            let mut body = json!({
                "label": label,
                "url": url,
                "openInNewTab": new_tab,
            });
            if let Some(description) = description {
                body["description"] = json!(description);
            }
            if let Some(thumbnail) = thumbnail {
                body["thumbnail"] = json!(thumbnail);
            }
            if let Some(color) = color {
                body["colorBar"] = json!(color);
            }
            if let Some(columns) = columns {
                body["gridColumns"] = json!(columns);
            }

            let link = expect_json(
                client
                    .post(format!("{}/dashboards/{}/links", api, slug))
                    .json(&body)
                    .send()
                    .await?,
            )
            .await?;

            if as_json {
                println!("{}", serde_json::to_string_pretty(&link)?);
            } else {
                println!("Added link {}", link["id"].as_str().unwrap_or("-"));
                match link["favicon"].as_str() {
                    Some(favicon) => println!("  Favicon: {}", favicon),
                    None if link.get("thumbnail").is_none() => println!("  No favicon found"),
                    None => {}
                }
            }
        }

        Commands::RemoveLink { slug, link_id } => {
            expect_json(
                client
                    .delete(format!("{}/dashboards/{}/links/{}", api, slug, link_id))
                    .send()
                    .await?,
            )
            .await?;
            println!("Removed link {}", link_id);
        }

        Commands::Refresh { slug } => {
            let result = expect_json(
                client
                    .post(format!("{}/dashboards/{}/refresh", api, slug))
                    .send()
                    .await?,
            )
            .await?;
            println!(
                "Downloaded {} favicon(s)",
                result["faviconsDownloaded"].as_u64().unwrap_or(0)
            );
        }

        Commands::Reorder { dashboards: wanted } => {
            let dashboards = expect_json(client.get(format!("{}/dashboards", api)).send().await?).await?;

            let mut ids = Vec::new();
            let mut slugs = Vec::new();
            for key in &wanted {
                let found = find_by_slug(&dashboards, key).or_else(|| find_by_id(&dashboards, key));
                match found {
                    Some(d) => {
                        ids.push(d["id"].clone());
                        slugs.push(d["slug"].as_str().unwrap_or("-").to_string());
                    }
                    None => {
                        eprintln!("Unknown dashboard: {}", key);
                        std::process::exit(1);
                    }
                }
            }

            let body = json!({ "dashboardIds": ids });
            expect_json(
                client
                    .post(format!("{}/dashboards/reorder", api))
                    .json(&body)
                    .send()
                    .await?,
            )
            .await?;
            println!("New order: {}", slugs.join(", "));
        }

        Commands::Repair => {
            let result =
                expect_json(client.post(format!("{}/dashboards/repair", api)).send().await?).await?;
            println!("{}", result["message"].as_str().unwrap_or("Done"));
            if result["repaired"].as_bool() == Some(true) {
                println!(
                    "  {:?} -> {:?}",
                    result["oldSlug"].as_str().unwrap_or(""),
                    result["newSlug"].as_str().unwrap_or("")
                );
            }
        }

        Commands::Settings => {
            let settings = expect_json(client.get(format!("{}/settings", api)).send().await?).await?;
            if as_json {
                println!("{}", serde_json::to_string_pretty(&settings)?);
            } else {
                println!("Theme:   {}", settings["defaultTheme"].as_str().unwrap_or("-"));
                println!(
                    "Default: {}",
                    settings["defaultDashboardSlug"].as_str().filter(|s| !s.is_empty()).unwrap_or("(none)")
                );
                println!();
                print_dashboards(&settings["dashboards"]);
            }
        }

        Commands::SetDefault { slug } => {
            let dashboards = expect_json(client.get(format!("{}/dashboards", api)).send().await?).await?;
            let Some(dashboard) = find_by_slug(&dashboards, &slug) else {
                eprintln!("Unknown dashboard: {}", slug);
                std::process::exit(1);
            };
            let slug = dashboard["slug"].as_str().unwrap_or(&slug).to_string();

            let body = json!({ "defaultDashboardSlug": slug });
            expect_json(client.put(format!("{}/settings", api)).json(&body).send().await?).await?;
            println!("Default dashboard set to {}", slug);
        }

        Commands::SetTheme { theme } => {
            let theme = theme.to_lowercase();
            if theme != "dark" && theme != "light" {
                eprintln!("Theme must be dark or light");
                std::process::exit(1);
            }
            let body = json!({ "defaultTheme": theme });
            expect_json(client.put(format!("{}/settings", api)).json(&body).send().await?).await?;
            println!("Theme set to {}", theme);
        }

        Commands::Export { output } => {
            let response = client.get(format!("{}/settings/export", api)).send().await?;
            if !response.status().is_success() {
                return Err(api_error(response).await);
            }

            let data = response.bytes().await?;
            if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&output, &data)?;
            println!("Exported {} bytes to {:?}", data.len(), output);
        }

        Commands::Import { path } => {
            if !path.exists() {
                eprintln!("File not found: {:?}", path);
                std::process::exit(1);
            }
            let data = std::fs::read(&path)?;

            let is_zip = path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case("zip"));

            if is_zip {
                let file_name = path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .unwrap_or("export.zip")
                    .to_string();
                let part = Part::bytes(data).file_name(file_name).mime_str("application/zip")?;
                let form = Form::new().part("file", part);

                let result = expect_json(
                    client
                        .post(format!("{}/settings/import", api))
                        .multipart(form)
                        .send()
                        .await?,
                )
                .await?;

                println!(
                    "Imported {} dashboard(s), {} failed",
                    result["imported"].as_u64().unwrap_or(0),
                    result["failed"].as_u64().unwrap_or(0)
                );
                if let Some(slugs) = result["slugs"].as_array() {
                    for slug in slugs {
                        println!("  {}", slug.as_str().unwrap_or("-"));
                    }
                }
            } else {
                let dashboard: Value = serde_json::from_slice(&data)?;
                let imported = expect_json(
                    client
                        .post(format!("{}/dashboards/import", api))
                        .json(&dashboard)
                        .send()
                        .await?,
                )
                .await?;
                println!(
                    "Imported dashboard as {}",
                    imported["slug"].as_str().unwrap_or("-")
                );
            }
        }
    }

    Ok(())
}

/// Parse a JSON body, turning API errors into their message
async fn expect_json(response: Response) -> anyhow::Result<Value> {
    if !response.status().is_success() {
        return Err(api_error(response).await);
    }
    Ok(response.json().await?)
}

async fn api_error(response: Response) -> anyhow::Error {
    let status = response.status();
    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<Value>(&text)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
        .unwrap_or(text);
    anyhow::anyhow!("Request failed ({}): {}", status, message)
}

fn find_by_slug<'a>(dashboards: &'a Value, slug: &str) -> Option<&'a Value> {
    dashboards.as_array()?.iter().find(|d| {
        d["slug"]
            .as_str()
            .is_some_and(|s| s.eq_ignore_ascii_case(slug))
    })
}

fn find_by_id<'a>(dashboards: &'a Value, id: &str) -> Option<&'a Value> {
    dashboards
        .as_array()?
        .iter()
        .find(|d| d["id"].as_str() == Some(id))
}

fn print_dashboards(dashboards: &Value) {
    let rows = match dashboards.as_array() {
        Some(rows) if !rows.is_empty() => rows,
        _ => {
            println!("No dashboards yet.");
            println!();
            println!("Create your first dashboard with:");
            println!("  warpdeck-cli create Home home");
            return;
        }
    };

    println!("{:<20} {:<24} {:>5}  {}", "Slug", "Title", "Links", "ID");
    println!("{}", "-".repeat(88));

    for dashboard in rows {
        let links = dashboard["links"]
            .as_array()
            .map(|l| l.len().to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<20} {:<24} {:>5}  {}",
            dashboard["slug"].as_str().unwrap_or("-"),
            dashboard["title"].as_str().unwrap_or("-"),
            links,
            dashboard["id"].as_str().unwrap_or("-")
        );
    }
}

fn print_dashboard(dashboard: &Value) {
    println!(
        "{} ({})",
        dashboard["title"].as_str().unwrap_or("-"),
        dashboard["slug"].as_str().unwrap_or("-")
    );
    println!();

    let links = match dashboard["links"].as_array() {
        Some(links) if !links.is_empty() => links,
        _ => {
            println!("No links.");
            return;
        }
    };

    println!("{:<24} {:<40} {}", "Label", "URL", "ID");
    println!("{}", "-".repeat(100));
    for link in links {
        println!(
            "{:<24} {:<40} {}",
            link["label"].as_str().unwrap_or("-"),
            link["url"].as_str().unwrap_or("-"),
            link["id"].as_str().unwrap_or("-")
        );
    }
}

fn format_duration(seconds: u64) -> String {
    if seconds < 60 {
        format!("{}s", seconds)
    } else if seconds < 3600 {
        format!("{}m {}s", seconds / 60, seconds % 60)
    } else if seconds < 86400 {
        format!("{}h {}m", seconds / 3600, (seconds % 3600) / 60)
    } else {
        format!("{}d {}h", seconds / 86400, (seconds % 86400) / 3600)
    }
}
