// Handler for the /help command.

use teloxide::prelude::*;
use tokio_util::sync::CancellationToken;

use crate::error::HandlerError;
use crate::registry::HandlerResult;

const HELP_TEXT: &str = "\
/qr <text> : encodes <text> into a QR code image
/qr as a photo caption : decodes the barcode or QR code in the attached photo
/qrwifi \"<ssid>\" \"<password>\" : encodes WPA Wi-Fi credentials into a QR code
/wttr [location1] [location2] ... : fetches a wttr.in weather image for each location, or for the default location if none is given
/id : shows the id of the current chat
/help : this help info";

pub async fn help(bot: Bot, msg: Message, shutdown: CancellationToken) -> HandlerResult {
    if shutdown.is_cancelled() {
        return Err(HandlerError::Cancelled);
    }

    bot.send_message(msg.chat.id, HELP_TEXT).await?;
    Ok(())
}
