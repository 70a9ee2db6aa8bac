use std::sync::Arc;

use banofbot_core::config::Config;

#[tokio::main]
async fn main() -> Result<(), banofbot_core::Error> {
    banofbot_core::logging::init("banofbot")?;

    let cfg = Arc::new(Config::load()?);
    tracing::info!(
        username = %cfg.bot_username,
        store = ?cfg.chat_store_file,
        "configuration loaded"
    );

    banofbot_telegram::router::run_polling(cfg)
        .await
        .map_err(|e| banofbot_core::Error::External(format!("telegram bot failed: {e}")))?;

    Ok(())
}
