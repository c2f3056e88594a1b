// Handler for the photo form of /qr: downloads the attached photo and tries
// to decode a barcode or QR code out of it. A missed scan is reported to the
// user as text; only unexpected failures (download errors, unreadable image
// data) propagate to the dispatch boundary.

use teloxide::net::Download;
use teloxide::prelude::*;
use tokio_util::sync::CancellationToken;

use crate::error::HandlerError;
use crate::qr;
use crate::registry::HandlerResult;

const DECODE_MISS: &str =
    "Decoding the barcode failed, maybe the image doesn't contain a readable code.";

pub async fn qr_decode(bot: Bot, msg: Message, shutdown: CancellationToken) -> HandlerResult {
    // Size variants are ordered smallest to largest; take the largest.
    let Some(photo) = msg.photo().and_then(|sizes| sizes.last()) else {
        bot.send_message(msg.chat.id, "Attach a photo with the /qr caption to decode it.")
            .await?;
        return Ok(());
    };

    if shutdown.is_cancelled() {
        return Err(HandlerError::Cancelled);
    }

    let file = bot.get_file(photo.file.id.clone()).await?;
    let mut bytes = Vec::new();
    bot.download_file(&file.path, &mut bytes).await?;

    if shutdown.is_cancelled() {
        return Err(HandlerError::Cancelled);
    }

    let reply = match qr::decode_image(&bytes)? {
        Some(content) => content,
        None => DECODE_MISS.to_owned(),
    };

    bot.send_message(msg.chat.id, reply).await?;
    Ok(())
}
