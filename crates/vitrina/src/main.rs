#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

mod cli;
mod notify;
mod pages;

use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context as _, Result, bail};
use dotenvy::dotenv;
use vitrina_core::host::InitData;
use vitrina_core::logging::init_logging;
use vitrina_core::storage::FileStorage;
use vitrina_core::{ApiClient, BearerAuth, Config, HostBridge, NotRendered, RouteGuard, SessionStore, StaticHost};

use cli::{Cli, Commands};
use pages::{ApplicationPage, BroadcastPage, CreatePage, EditPage, EntryAction, HomePage, Page};

/// How long verification may take before the wait indicator shows
const WAIT_INDICATOR_DELAY: Duration = Duration::from_millis(300);

/// Main entry point for the storefront CLI
///
/// Every subcommand except `dev-init-data` opens one page behind the route
/// guard, the way the Mini App mounts a route.
///
/// # Errors
/// Returns an error if configuration, logging or storage cannot be set up.
#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse_args();

    // Load environment variables from .env if present
    let _ = dotenv();

    let config = Config::load_from(&cli.config).context("failed to load configuration")?;
    init_logging(&config.log_level)?;

    match cli.command.unwrap_or_default() {
        Commands::DevInitData {
            bot_token,
            user_id,
            username,
            check,
        } => run_dev_init_data(&bot_token, user_id, &username, check.as_deref()),
        command => run_page(command, cli.init_data, config).await,
    }
}

/// Mounts the page for `command` behind a fresh route guard.
async fn run_page(command: Commands, init_data: Option<String>, config: Config) -> Result<ExitCode> {
    let page = into_page(command)?;
    let route = page.route();

    let storage = Arc::new(FileStorage::open(&config.storage_path)?);
    let store = SessionStore::new(storage);
    let api = Arc::new(ApiClient::from_config(&config)?.with_decorator(BearerAuth::new(store.clone())));

    let host = StaticHost::new(init_data.or_else(|| config.init_data.clone()));
    if !host.has_payload() {
        // Without a payload the guard would stay pending forever.
        bail!("no init data: pass --init-data, set TG_INIT_DATA or init_data in the config file");
    }

    tracing::info!(route = %route, api_url = %api.base_url(), "Opening page");
    let guard = RouteGuard::mount(route.path(), api, store, &host);

    let mut states = guard.subscribe();
    let indicator = tokio::spawn(async move {
        tokio::select! {
            _ = async {
                let _ = states.wait_for(|state| !state.is_pending()).await;
            } => {}
            () = tokio::time::sleep(WAIT_INDICATOR_DELAY) => eprintln!("⏳ Verifying session..."),
        }
    });

    let rendered = tokio::select! {
        rendered = guard.render(page) => rendered,
        _ = tokio::signal::ctrl_c() => {
            guard.teardown();
            Err(NotRendered::TornDown)
        }
    };
    indicator.abort();

    match rendered {
        Ok(Ok(())) => {
            host.ready();
            Ok(ExitCode::SUCCESS)
        }
        Ok(Err(err)) => {
            tracing::debug!(route = %route, error = %err, "Page action failed");
            Ok(ExitCode::FAILURE)
        }
        Err(NotRendered::Redirected(redirect)) => {
            print!("{}", pages::unauthorized::render(&redirect));
            Ok(ExitCode::FAILURE)
        }
        Err(NotRendered::TornDown) => {
            notify::failure("Interrupted before the session was verified");
            Ok(ExitCode::FAILURE)
        }
    }
}

fn into_page(command: Commands) -> Result<Page> {
    Ok(match command {
        Commands::Home { toggle_admin } => Page::Home(HomePage { toggle_admin }),
        Commands::Show { id } => Page::Application(ApplicationPage {
            id,
            action: EntryAction::Show,
        }),
        Commands::Open { id } => Page::Application(ApplicationPage {
            id,
            action: EntryAction::Open,
        }),
        Commands::Delete { id } => Page::Application(ApplicationPage {
            id,
            action: EntryAction::Delete,
        }),
        Commands::Promote { id } => Page::Application(ApplicationPage {
            id,
            action: EntryAction::Promote,
        }),
        Commands::Create { file } => Page::Create(CreatePage {
            draft: pages::editor::read_form(&file)?,
        }),
        Commands::Edit { id, file } => Page::Edit(EditPage {
            id,
            patch: pages::editor::read_form(&file)?,
        }),
        Commands::Broadcast { text, attach } => Page::Broadcast(BroadcastPage {
            text,
            attachments: attach,
        }),
        Commands::DevInitData { .. } => bail!("dev-init-data does not open a page"),
    })
}

/// Signs init data for local development, or checks a payload.
fn run_dev_init_data(bot_token: &str, user_id: i64, username: &str, check: Option<&str>) -> Result<ExitCode> {
    if let Some(payload) = check {
        let init_data = InitData::parse(payload)?;
        return Ok(match init_data.verify(bot_token, None) {
            Ok(()) => {
                notify::success(format!(
                    "Valid init data for user {}",
                    init_data
                        .unverified_user_id()
                        .map_or_else(|| "unknown".to_string(), |id| id.to_string())
                ));
                ExitCode::SUCCESS
            }
            Err(err) => {
                notify::failure(format!("Invalid init data: {err}"));
                ExitCode::FAILURE
            }
        });
    }

    let user = serde_json::json!({ "id": user_id, "first_name": username, "username": username }).to_string();
    let auth_date = chrono::Utc::now().timestamp().to_string();
    let payload = InitData::sign(&[("user", user.as_str()), ("auth_date", auth_date.as_str())], bot_token)?;
    println!("{payload}");
    Ok(ExitCode::SUCCESS)
}
