// Handler for the /id command: replies with the id of the current chat,
// which works the same for private and group chats.

use teloxide::prelude::*;
use tokio_util::sync::CancellationToken;

use crate::error::HandlerError;
use crate::registry::HandlerResult;

pub async fn id(bot: Bot, msg: Message, shutdown: CancellationToken) -> HandlerResult {
    if shutdown.is_cancelled() {
        return Err(HandlerError::Cancelled);
    }

    bot.send_message(msg.chat.id, msg.chat.id.to_string()).await?;
    Ok(())
}
