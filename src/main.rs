use std::sync::Arc;

use async_trait::async_trait;

use photosave::errors::{AppError, AppResult};
use photosave::host::{Host, InstallReason, MenuClick, MenuItem};
use photosave::menu::{MenuController, MENU_ID};
use photosave::token::AccessToken;
use photosave::{config, Config};

const TOKEN_ENV_VAR: &str = "PHOTOSAVE_ACCESS_TOKEN";

/// Host backed by the local system: the bearer token comes from the
/// environment and notifications land in the log. A real browser host would
/// replace this with identity/notification/menu platform calls.
struct SystemHost;

#[async_trait]
impl Host for SystemHost {
    async fn acquire_token(&self, interactive: bool) -> AppResult<AccessToken> {
        match std::env::var(TOKEN_ENV_VAR) {
            Ok(token) if !token.is_empty() => Ok(AccessToken::new(token)),
            _ if interactive => Err(AppError::Auth(format!(
                "set {} to a valid OAuth bearer token and run again",
                TOKEN_ENV_VAR
            ))),
            _ => Err(AppError::auth("no access token available")),
        }
    }

    async fn invalidate_token(&self, _token: &AccessToken) -> AppResult<()> {
        log::warn!("Token rejected by the API; rotate {}", TOKEN_ENV_VAR);
        Ok(())
    }

    async fn notify(&self, title: &str, message: &str) -> AppResult<()> {
        log::info!("[{}] {}", title, message);
        Ok(())
    }

    async fn register_menu(&self, item: MenuItem) -> AppResult<()> {
        log::debug!("Menu entry '{}' ({}) registered", item.title, item.id);
        Ok(())
    }
}

fn init_logging(config: &Config) {
    let level = config
        .log_level
        .parse::<log::LevelFilter>()
        .unwrap_or(log::LevelFilter::Info);
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();
}

async fn run() -> AppResult<()> {
    let (config, fresh_install) = config::load_or_create()?;
    init_logging(&config);

    log::info!("Starting photosave");
    if fresh_install {
        log::info!("First run, created default config");
    }

    let urls: Vec<String> = std::env::args().skip(1).collect();
    if urls.is_empty() {
        eprintln!("Usage: photosave <image-url>...");
        return Err(AppError::config("no image URL given"));
    }

    let reason = if fresh_install {
        InstallReason::Install
    } else {
        InstallReason::Update
    };

    let controller = MenuController::new(Arc::new(SystemHost), &config)?;
    controller.on_installed(reason).await?;

    for src_url in urls {
        controller
            .on_menu_click(MenuClick {
                menu_item_id: MENU_ID.to_string(),
                src_url,
            })
            .await;
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        log::error!("Fatal: {}", e);
        std::process::exit(1);
    }
}
