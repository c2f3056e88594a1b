// Handler for /wttr: fetches a weather image from wttr.in for each requested
// location. Locations are fetched strictly one after another so replies
// arrive in the order they were asked for; a failing location gets its own
// error reply and does not abort the remaining ones.

use std::sync::Arc;

use teloxide::prelude::*;
use teloxide::types::InputFile;
use tokio_util::sync::CancellationToken;

use crate::config::AppConfig;
use crate::error::HandlerError;
use crate::registry::HandlerResult;

pub async fn wttr(
    bot: Bot,
    msg: Message,
    shutdown: CancellationToken,
    cfg: Arc<AppConfig>,
) -> HandlerResult {
    let text = msg.text().unwrap_or_default();
    let mut locations: Vec<String> = text
        .split_whitespace()
        .skip(1) // skip the command itself
        .map(str::to_owned)
        .collect();

    if locations.is_empty() {
        locations.push(cfg.wttr_default_location.clone());
    }

    for location in locations {
        if shutdown.is_cancelled() {
            return Err(HandlerError::Cancelled);
        }

        let url = format!("{}/{location}.png", cfg.wttr_base_url);
        match fetch_weather_png(&url, &shutdown).await? {
            Some(png) => {
                bot.send_photo(msg.chat.id, InputFile::memory(png).file_name("wttr.png"))
                    .caption(format!("Weather in {location}"))
                    .await?;
            }
            None => {
                bot.send_message(
                    msg.chat.id,
                    format!("Error while fetching wttr.in weather for {location}"),
                )
                .await?;
            }
        }
    }

    Ok(())
}

// `Ok(None)` is a fetch failure worth reporting per location; `Err` is only
// returned for cancellation.
async fn fetch_weather_png(
    url: &str,
    shutdown: &CancellationToken,
) -> Result<Option<Vec<u8>>, HandlerError> {
    let response = tokio::select! {
        _ = shutdown.cancelled() => return Err(HandlerError::Cancelled),
        res = reqwest::get(url) => res,
    };

    let response = match response.and_then(|r| r.error_for_status()) {
        Ok(r) => r,
        Err(e) => {
            tracing::warn!("weather fetch for {url} failed: {e}");
            return Ok(None);
        }
    };

    match response.bytes().await {
        Ok(bytes) => Ok(Some(bytes.to_vec())),
        Err(e) => {
            tracing::warn!("weather body read for {url} failed: {e}");
            Ok(None)
        }
    }
}
