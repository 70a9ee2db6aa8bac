use std::sync::Arc;

use teloxide::{dispatching::Dispatcher, dptree, prelude::*};

use banofbot_core::{
    analytics,
    callback::CallbackRouter,
    classify::Classifier,
    config::Config,
    dispatch::{Collaborators, Dispatcher as MessageDispatcher},
    messaging::port::MessagingPort,
    ports::{ActionHandlers, ChatStore, PermissionOracle},
    startup::StartupGate,
    store::JsonChatStore,
};

use crate::{
    actions::TelegramActions, admins::TelegramPermissionOracle, handlers,
    moderation::LoggedRequests, TelegramMessenger,
};

pub struct AppState {
    pub dispatcher: MessageDispatcher,
    pub callbacks: CallbackRouter,
    pub messenger: Arc<dyn MessagingPort>,
}

pub async fn run_polling(cfg: Arc<Config>) -> anyhow::Result<()> {
    // Start the grace window before anything else so it covers the backlog
    // delivered by the first poll.
    let gate = StartupGate::new(cfg.startup_grace);

    let bot = Bot::new(cfg.telegram_bot_token.clone());
    match bot.get_me().await {
        Ok(me) => {
            let actual = me.username();
            tracing::info!("banofbot started: @{actual}");
            if actual != cfg.bot_username {
                tracing::warn!(
                    configured = %cfg.bot_username,
                    actual,
                    "BOT_USERNAME does not match the bot account; mentions will be misclassified"
                );
            }
        }
        Err(e) => tracing::warn!("getMe failed: {e}"),
    }

    let chats: Arc<dyn ChatStore> = Arc::new(JsonChatStore::from_config(&cfg)?);
    let messenger: Arc<dyn MessagingPort> = Arc::new(TelegramMessenger::new(bot.clone()));
    let admins: Arc<dyn PermissionOracle> = Arc::new(TelegramPermissionOracle::new(bot.clone()));
    let actions: Arc<dyn ActionHandlers> = Arc::new(TelegramActions::new(
        messenger.clone(),
        chats.clone(),
        admins.clone(),
        Arc::new(LoggedRequests::new(messenger.clone())),
    ));

    let dispatcher = MessageDispatcher::new(
        gate,
        Classifier::from_config(&cfg),
        Collaborators {
            chats,
            admins,
            actions: actions.clone(),
            analytics: analytics::from_config(&cfg),
        },
    );

    let state = Arc::new(AppState {
        dispatcher,
        callbacks: CallbackRouter::new(actions),
        messenger,
    });

    tracing::info!(
        grace_ms = cfg.startup_grace.as_millis() as u64,
        "polling; messages are dropped until the startup grace elapses"
    );

    let handler = dptree::entry()
        .branch(Update::filter_callback_query().endpoint(handlers::handle_callback))
        .branch(Update::filter_message().endpoint(handlers::handle_message));

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![state])
        .build()
        .dispatch()
        .await;

    Ok(())
}
