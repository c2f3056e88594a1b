// Handler for the text form of /qr: encodes the rest of the message into a
// QR code image and sends it back with the payload as caption.

use teloxide::prelude::*;
use teloxide::types::InputFile;
use tokio_util::sync::CancellationToken;

use crate::error::HandlerError;
use crate::qr;
use crate::registry::HandlerResult;

const USAGE: &str = "Usage: /qr <text>";

pub async fn qr_encode(bot: Bot, msg: Message, shutdown: CancellationToken) -> HandlerResult {
    // Everything after the command token; tolerates leading whitespace the
    // classifier already skips over.
    let text = msg.text().unwrap_or_default();
    let payload = text
        .trim_start()
        .split_once(char::is_whitespace)
        .map(|(_, rest)| rest.trim())
        .unwrap_or_default();

    if payload.is_empty() {
        bot.send_message(msg.chat.id, USAGE).await?;
        return Ok(());
    }

    let png = qr::encode_png(payload)?;

    if shutdown.is_cancelled() {
        return Err(HandlerError::Cancelled);
    }

    bot.send_photo(msg.chat.id, InputFile::memory(png).file_name("qr.png"))
        .caption(payload.to_owned())
        .await?;
    Ok(())
}
