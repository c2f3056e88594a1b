// Handler for /qrwifi: encodes WPA Wi-Fi credentials into a QR code that
// phone camera apps understand.

use once_cell::sync::Lazy;
use regex::Regex;
use teloxide::prelude::*;
use teloxide::types::InputFile;
use tokio_util::sync::CancellationToken;

use crate::error::HandlerError;
use crate::qr;
use crate::registry::HandlerResult;

const FORMAT_ERROR: &str = "Wrong format, be sure to write: /qrwifi \"<SSID>\" \"<PASSWORD>\"";

// Two double-quoted tokens anywhere after the command.
static WIFI_ARGS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""([^"]*)"\s*"([^"]*)""#).expect("valid wifi args pattern"));

pub async fn qr_wifi(bot: Bot, msg: Message, shutdown: CancellationToken) -> HandlerResult {
    let text = msg.text().unwrap_or_default();

    let Some(captures) = WIFI_ARGS.captures(text) else {
        bot.send_message(msg.chat.id, FORMAT_ERROR).await?;
        return Ok(());
    };
    let ssid = &captures[1];
    let password = &captures[2];

    let png = qr::encode_png(&qr::wifi_payload(ssid, password))?;

    if shutdown.is_cancelled() {
        return Err(HandlerError::Cancelled);
    }

    bot.send_photo(msg.chat.id, InputFile::memory(png).file_name("qrwifi.png"))
        .caption(format!("QR-Code for Wifi: {ssid}"))
        .await?;
    Ok(())
}
