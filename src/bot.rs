//! The Telegram transport: dispatcher wiring and reply-keyboard rendering.
//!
//! No business logic lives here. Each message is handed to the engine; the
//! engine's `Reply` is rendered into a Telegram reply keyboard.

use crate::engine::{ChatUser, Engine, Reply};
use crate::sheets::{create_ledger, Mode};
use crate::{Config, Result};
use std::sync::Arc;
use teloxide::dispatching::UpdateFilterExt;
use teloxide::dptree;
use teloxide::error_handlers::LoggingErrorHandler;
use teloxide::prelude::*;
use teloxide::types::{KeyboardButton, KeyboardMarkup, ReplyMarkup};
use tracing::{debug, error, info, warn};

/// Builds the engine for the given mode and runs the long-polling dispatcher
/// until shutdown.
pub async fn run_bot(config: Config, mode: Mode) -> Result<()> {
    let ledger = create_ledger(&config, mode).await?;
    let engine = Arc::new(Engine::new(ledger));
    let bot = Bot::new(config.bot_token());

    let handler = dptree::entry().branch(Update::filter_message().endpoint(on_message));

    info!("Starting dispatcher with long polling");
    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![engine])
        .default_handler(|update| async move {
            debug!("Unhandled update: {update:?}");
        })
        .error_handler(LoggingErrorHandler::with_custom_text(
            "Error in message handler",
        ))
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    warn!("Dispatcher stopped");
    Ok(())
}

/// Message handler endpoint for the dispatcher.
///
/// A spreadsheet fault terminates the in-flight request: the error is logged
/// and the message dropped, with no retry.
async fn on_message(bot: Bot, msg: Message, engine: Arc<Engine>) -> ResponseResult<()> {
    let Some(text) = msg.text() else {
        return Ok(());
    };
    let Some(from) = msg.from.as_ref() else {
        return Ok(());
    };
    let user = ChatUser {
        id: from.id.0,
        name: from.first_name.clone(),
    };

    match engine.handle(&user, text).await {
        Ok(Some(reply)) => send_reply(&bot, msg.chat.id, &reply).await?,
        Ok(None) => debug!("Ignoring message from user {}", user.id),
        Err(e) => error!("Dropping message from user {}: {e:#}", user.id),
    }
    Ok(())
}

async fn send_reply(bot: &Bot, chat_id: ChatId, reply: &Reply) -> ResponseResult<()> {
    let mut request = bot.send_message(chat_id, reply.message());
    if let Some(labels) = reply.keyboard() {
        request = request.reply_markup(keyboard(labels));
    }
    request.await?;
    Ok(())
}

/// Groups labels two per row, matching the original menu layout.
fn keyboard(labels: &[String]) -> ReplyMarkup {
    let rows: Vec<Vec<KeyboardButton>> = labels
        .chunks(2)
        .map(|pair| pair.iter().map(|label| KeyboardButton::new(label.clone())).collect())
        .collect();
    ReplyMarkup::Keyboard(KeyboardMarkup::new(rows).resize_keyboard())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyboard_two_per_row() {
        let labels: Vec<String> = ["a", "b", "c"].iter().map(|s| s.to_string()).collect();
        let ReplyMarkup::Keyboard(markup) = keyboard(&labels) else {
            panic!("expected a reply keyboard");
        };
        assert_eq!(markup.keyboard.len(), 2);
        assert_eq!(markup.keyboard[0].len(), 2);
        assert_eq!(markup.keyboard[1].len(), 1);
    }
}
