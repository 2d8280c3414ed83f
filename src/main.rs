mod config;
mod gate;
mod openai;
mod responder;
mod telegram;

use std::sync::Arc;

use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;
use tracing::{error, info, warn};
use tracing_subscriber::prelude::*;

use config::Config;
use responder::{IncomingMessage, respond};
use telegram::TelegramSink;

struct AppState {
    config: Config,
    openai: openai::Client,
    bot_username: Option<String>,
}

#[derive(BotCommands, Clone)]
#[command(rename_rule = "lowercase")]
enum Command {
    #[command(description = "start the bot")]
    Start,
    #[command(description = "show this help message")]
    Help,
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer().with_filter(
                tracing_subscriber::EnvFilter::from_default_env()
                    .add_directive(tracing::Level::INFO.into()),
            ),
        )
        .init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("{e}");
            std::process::exit(1);
        }
    };

    let bot = Bot::new(&config.telegram_bot_token);

    // Mention detection needs the bot's own username.
    let bot_username = match bot.get_me().await {
        Ok(me) => {
            info!("Bot username: @{}", me.username());
            Some(me.username().to_string())
        }
        Err(e) => {
            warn!("Failed to get bot info: {e}");
            None
        }
    };

    info!("🚀 Starting bot (group chat: {})", config.group_chat_id);

    let state = Arc::new(AppState {
        openai: openai::Client::new(config.openai_api_key.clone()),
        bot_username,
        config,
    });

    let handler = dptree::entry()
        .branch(
            Update::filter_message()
                .filter_command::<Command>()
                .endpoint(handle_command),
        )
        .branch(Update::filter_message().endpoint(handle_message));

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![state])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;
}

async fn handle_command(bot: Bot, msg: Message, cmd: Command) -> ResponseResult<()> {
    let reply = match cmd {
        Command::Start => responder::GREETING,
        Command::Help => responder::HELP_TEXT,
    };
    bot.send_message(msg.chat.id, reply).await?;
    Ok(())
}

async fn handle_message(bot: Bot, msg: Message, state: Arc<AppState>) -> ResponseResult<()> {
    let user = match msg.from {
        Some(ref u) => u,
        None => return Ok(()),
    };

    let text = match msg.text() {
        Some(t) => t,
        None => return Ok(()),
    };

    // Command-shaped texts never reach the heuristic; /start and /help
    // were already consumed by the command branch.
    if text.starts_with('/') {
        return Ok(());
    }

    let incoming = IncomingMessage {
        chat_id: msg.chat.id.0,
        sender_is_bot: user.is_bot,
        text: text.to_string(),
    };
    let sink = TelegramSink::new(bot, msg.chat.id, msg.id);

    let outcome = respond(
        &incoming,
        &state.config.group_chat_id,
        state.bot_username.as_deref(),
        &state.openai,
        &sink,
    )
    .await;

    let preview: String = incoming.text.chars().take(100).collect();
    info!("Message in chat {}: \"{preview}\" → {:?}", incoming.chat_id, outcome);

    Ok(())
}
