//! `pantry`: terminal front end for the food inventory service.
//!
//! Talks to the REST API through `pantry-client`, keeps the theme preference
//! in a small JSON file, and reports every outcome as a toast on stderr.

mod render;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use pantry_client::config::{API_URL_ENV, DEFAULT_API_URL};
use pantry_client::{ApiClient, ClientConfig};
use pantry_common::product::UpdateProductRequest;
use pantry_common::settings::Settings;
use pantry_common::theme::ThemeId;
use pantry_ui::{FileStore, ThemeStore, ToastStore};

#[derive(Parser)]
#[command(name = "pantry", about = "Household food inventory client")]
struct Cli {
    /// Base URL of the inventory API, including any proxy prefix.
    #[arg(long, env = API_URL_ENV, default_value = DEFAULT_API_URL, global = true)]
    api_url: String,

    /// Preferences file (default: <config dir>/pantry/preferences.json).
    #[arg(long, global = true)]
    state_file: Option<PathBuf>,

    /// Log request flow to stderr.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List, add or remove stock.
    Inventory {
        #[command(subcommand)]
        action: InventoryAction,
    },
    /// Show active low-stock and expiry alerts.
    Alerts,
    /// Read or change server settings.
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
    /// Edit product metadata.
    Product {
        #[command(subcommand)]
        action: ProductAction,
    },
    /// Check that the server is up (or ready, with --ready).
    Health {
        #[arg(long)]
        ready: bool,
    },
    /// Pick the UI theme.
    Theme {
        #[command(subcommand)]
        action: ThemeAction,
    },
}

#[derive(Subcommand)]
enum InventoryAction {
    List,
    /// Add one unit of a product by EAN.
    Add {
        ean: String,
        /// Expiry date, YYYY-MM-DD.
        #[arg(long)]
        expires: Option<NaiveDate>,
    },
    /// Remove one unit of a product by EAN.
    Remove { ean: String },
}

#[derive(Subcommand)]
enum SettingsAction {
    Get,
    Set {
        #[arg(long)]
        expiry_warning_days: u32,
    },
}

#[derive(Subcommand)]
enum ProductAction {
    /// Override the resolved name (and optionally category) of a product.
    Rename {
        ean: String,
        name: String,
        #[arg(long)]
        category: Option<String>,
    },
}

#[derive(Subcommand)]
enum ThemeAction {
    List,
    Show,
    Set { id: ThemeId },
}

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "pantry=debug,pantry_client=debug,pantry_ui=debug"
    } else {
        "error"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn default_state_file() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("pantry")
        .join("preferences.json")
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let toasts = ToastStore::new();
    let printer = tokio::spawn(render::print_toasts(toasts.subscribe()));

    let result = run(cli, &toasts).await;
    if let Err(e) = &result {
        toasts.error(format!("{e:#}"));
    }

    // Dropping the last handle closes the channel; the printer drains and exits.
    drop(toasts);
    let _ = printer.await;

    if result.is_ok() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

async fn run(cli: Cli, toasts: &ToastStore) -> anyhow::Result<()> {
    let Cli {
        api_url,
        state_file,
        command,
        ..
    } = cli;
    let api = || -> anyhow::Result<ApiClient> {
        let config = ClientConfig::new(&api_url)?;
        tracing::debug!(base_url = config.base_url(), "using API");
        Ok(ApiClient::new(config))
    };

    match command {
        Command::Inventory { action } => run_inventory(action, &api()?, toasts).await,
        Command::Alerts => run_alerts(&api()?, toasts).await,
        Command::Settings { action } => run_settings(action, &api()?, toasts).await,
        Command::Product { action } => run_product(action, &api()?, toasts).await,
        Command::Health { ready } => run_health(ready, &api()?, toasts).await,
        Command::Theme { action } => {
            let path = state_file.unwrap_or_else(default_state_file);
            run_theme(action, ThemeStore::new(FileStore::new(path)), toasts)
        }
    }
}

async fn run_inventory(
    action: InventoryAction,
    client: &ApiClient,
    toasts: &ToastStore,
) -> anyhow::Result<()> {
    match action {
        InventoryAction::List => {
            let entries = client.inventory().list().await.context("listing inventory")?;
            print!("{}", render::inventory_table(&entries));
        }
        InventoryAction::Add { ean, expires } => {
            let entry = client
                .inventory()
                .add(&ean, expires)
                .await
                .with_context(|| format!("adding {ean}"))?;
            toasts.success(format!(
                "Added {} ({} in stock)",
                entry.product.name, entry.quantity
            ));
        }
        InventoryAction::Remove { ean } => {
            let remaining = client
                .inventory()
                .remove(&ean)
                .await
                .with_context(|| format!("removing {ean}"))?;
            match remaining {
                Some(entry) if entry.is_low_stock() => {
                    toasts.warning(format!(
                        "Removed one {}; only {} left",
                        entry.product.name, entry.quantity
                    ));
                }
                Some(entry) => {
                    toasts.success(format!(
                        "Removed one {} ({} left)",
                        entry.product.name, entry.quantity
                    ));
                }
                None => {
                    toasts.success(format!("Removed the last unit of {ean}"));
                }
            }
        }
    }
    Ok(())
}

async fn run_alerts(client: &ApiClient, toasts: &ToastStore) -> anyhow::Result<()> {
    let alerts = client.alerts().list().await.context("fetching alerts")?;
    print!("{}", render::alert_list(&alerts));
    if !alerts.is_empty() {
        toasts.warning(format!("{} active alert(s)", alerts.len()));
    }
    Ok(())
}

async fn run_settings(
    action: SettingsAction,
    client: &ApiClient,
    toasts: &ToastStore,
) -> anyhow::Result<()> {
    match action {
        SettingsAction::Get => {
            let s = client.settings().get().await.context("fetching settings")?;
            println!("expiry_warning_days = {}", s.expiry_warning_days);
        }
        SettingsAction::Set {
            expiry_warning_days,
        } => {
            let wanted = Settings {
                expiry_warning_days,
            };
            wanted.validate()?;
            let saved = client
                .settings()
                .update(&wanted)
                .await
                .context("updating settings")?;
            toasts.success(format!(
                "Expiry warnings now {} day(s) ahead",
                saved.expiry_warning_days
            ));
        }
    }
    Ok(())
}

async fn run_product(
    action: ProductAction,
    client: &ApiClient,
    toasts: &ToastStore,
) -> anyhow::Result<()> {
    match action {
        ProductAction::Rename {
            ean,
            name,
            category,
        } => {
            let update = UpdateProductRequest { name, category };
            update.validate()?;
            client
                .products()
                .update(&ean, &update)
                .await
                .with_context(|| format!("renaming {ean}"))?;
            toasts.success(format!("Renamed {ean} to {}", update.name));
        }
    }
    Ok(())
}

async fn run_health(ready: bool, client: &ApiClient, toasts: &ToastStore) -> anyhow::Result<()> {
    let status = if ready {
        client.ready().await.context("readiness check")?
    } else {
        client.health().await.context("health check")?
    };
    toasts.success(format!("{}: {}", client.config().base_url(), status.status));
    Ok(())
}

fn run_theme(
    action: ThemeAction,
    themes: ThemeStore<FileStore>,
    toasts: &ToastStore,
) -> anyhow::Result<()> {
    let current = themes.init();
    match action {
        ThemeAction::List => print!("{}", render::theme_picker(themes.themes(), current)),
        ThemeAction::Show => {
            let info = current.info();
            println!("{} ({}): {}", info.name, info.id, info.description);
        }
        ThemeAction::Set { id } => {
            themes.set(id).with_context(|| {
                format!("saving theme to {}", themes.storage().path().display())
            })?;
            toasts.success(format!("Theme set to {}", id.info().name));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::Path;
    use axum::http::StatusCode;
    use axum::response::{IntoResponse, Response};
    use axum::routing::{delete, get};
    use axum::{Json, Router};
    use clap::CommandFactory;
    use pantry_common::toast::ToastKind;
    use serde_json::json;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_add_with_expiry() {
        let cli = Cli::parse_from([
            "pantry",
            "inventory",
            "add",
            "4006381333931",
            "--expires",
            "2026-11-02",
        ]);
        match cli.command {
            Command::Inventory {
                action: InventoryAction::Add { ean, expires },
            } => {
                assert_eq!(ean, "4006381333931");
                assert_eq!(expires, NaiveDate::from_ymd_opt(2026, 11, 2));
            }
            _ => panic!("expected inventory add"),
        }
    }

    #[test]
    fn test_theme_ids_parse_and_reject() {
        let cli = Cli::parse_from(["pantry", "theme", "set", "glass"]);
        assert!(matches!(
            cli.command,
            Command::Theme {
                action: ThemeAction::Set { id: ThemeId::Glass }
            }
        ));
        assert!(Cli::try_parse_from(["pantry", "theme", "set", "neon"]).is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from([
            "pantry",
            "alerts",
            "--api-url",
            "http://pantry.local/api",
            "-v",
        ]);
        assert_eq!(cli.api_url, "http://pantry.local/api");
        assert!(cli.verbose);
    }

    async fn remove_one(Path(ean): Path<String>) -> Response {
        match ean.as_str() {
            "96385074" => Json(json!({
                "id": 1,
                "product": { "ean": ean, "name": "Eggs", "category": null, "image_url": null },
                "quantity": 1,
                "expiry_date": null,
                "low_stock_threshold": 2
            }))
            .into_response(),
            "4006381333931" => StatusCode::NO_CONTENT.into_response(),
            _ => (
                StatusCode::NOT_FOUND,
                Json(json!({ "code": "NOT_FOUND", "message": "no inventory entry" })),
            )
                .into_response(),
        }
    }

    async fn mock_api() -> ApiClient {
        let app = Router::new()
            .route("/api/inventory/{ean}", delete(remove_one))
            .route("/api/health", get(|| async { Json(json!({ "status": "ok" })) }));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        ApiClient::new(ClientConfig::new(&format!("http://{addr}/api")).unwrap())
    }

    #[tokio::test]
    async fn test_remove_reports_low_stock_and_last_unit() {
        let client = mock_api().await;
        let toasts = ToastStore::new();

        let remove = |ean: &str| InventoryAction::Remove { ean: ean.to_string() };
        run_inventory(remove("96385074"), &client, &toasts).await.unwrap();
        run_inventory(remove("4006381333931"), &client, &toasts).await.unwrap();

        let shown: Vec<_> = toasts.toasts().into_iter().map(|t| (t.kind, t.message)).collect();
        assert_eq!(
            shown,
            [
                (ToastKind::Warning, "Removed one Eggs; only 1 left".to_string()),
                (ToastKind::Success, "Removed the last unit of 4006381333931".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_remove_failure_carries_context() {
        let client = mock_api().await;
        let toasts = ToastStore::new();

        let err = run_inventory(
            InventoryAction::Remove {
                ean: "73513537".to_string(),
            },
            &client,
            &toasts,
        )
        .await
        .unwrap_err();
        assert_eq!(err.to_string(), "removing 73513537");
        assert!(format!("{err:#}").contains("NOT_FOUND"));
        assert!(toasts.toasts().is_empty());
    }

    #[tokio::test]
    async fn test_health_reports_base_url() {
        let client = mock_api().await;
        let toasts = ToastStore::new();
        run_health(false, &client, &toasts).await.unwrap();

        let expected = format!("{}: ok", client.config().base_url());
        assert_eq!(toasts.toasts()[0].message, expected);
    }

    #[tokio::test]
    async fn test_theme_set_persists_to_state_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        let toasts = ToastStore::new();

        run_theme(
            ThemeAction::Set { id: ThemeId::Warm },
            ThemeStore::new(FileStore::new(&path)),
            &toasts,
        )
        .unwrap();
        assert_eq!(toasts.toasts()[0].message, "Theme set to Warm Organic");

        let next = ThemeStore::new(FileStore::new(&path));
        assert_eq!(next.init(), ThemeId::Warm);
    }
}
