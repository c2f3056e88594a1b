use std::sync::Arc;

use teloxide::dispatching::UpdateHandler;
use teloxide::prelude::*;
use tokio_util::sync::CancellationToken;

use crate::error::HandlerError;
use crate::registry::CommandRegistry;

const GENERIC_ERROR_REPLY: &str = "Something went wrong while handling that command.";

/// How an update should be routed: through the text table keyed by the first
/// whitespace token, or through the photo table keyed by the trimmed caption.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Text(String),
    PhotoCaption(String),
}

/// Classifies a message into a dispatch route.
///
/// Photo with a non-empty caption routes by the full trimmed caption; photo
/// without a caption is dropped. Text routes by its first token. Anything
/// else (stickers, voice notes, empty text) yields `None`, which the
/// dispatcher treats as a silent no-op. Classification never fails.
pub fn classify(msg: &Message) -> Option<Route> {
    if msg.photo().is_some() {
        let caption = msg.caption().map(str::trim).unwrap_or_default();
        if caption.is_empty() {
            return None;
        }
        return Some(Route::PhotoCaption(caption.to_owned()));
    }

    let first_token = msg.text().and_then(|text| text.split_whitespace().next())?;
    Some(Route::Text(first_token.to_owned()))
}

/// Dispatch endpoint for one message update.
///
/// Unknown commands complete immediately with no reply. Handler failures are
/// contained here: they are logged and answered with a generic error reply so
/// one bad update can never take down the receive loop.
pub async fn dispatch_message(
    bot: Bot,
    msg: Message,
    registry: Arc<CommandRegistry>,
    shutdown: CancellationToken,
) -> ResponseResult<()> {
    let Some(route) = classify(&msg) else {
        return Ok(());
    };

    let handler = match &route {
        Route::Text(command) => registry.text_handler(command),
        Route::PhotoCaption(command) => registry.photo_handler(command),
    };
    let Some(handler) = handler else {
        tracing::debug!("no handler for {:?}, ignoring", route);
        return Ok(());
    };

    tracing::info!("dispatching {:?} for chat {}", route, msg.chat.id);

    let chat_id = msg.chat.id;
    if let Err(e) = handler(bot.clone(), msg, shutdown).await {
        match e {
            HandlerError::Cancelled => {
                tracing::info!("handler for {:?} cancelled by shutdown", route);
            }
            e => {
                tracing::error!("handler for {:?} failed: {e}", route);
                if let Err(send_err) = bot.send_message(chat_id, GENERIC_ERROR_REPLY).await {
                    tracing::error!("failed to report handler error: {send_err}");
                }
            }
        }
    }

    Ok(())
}

pub fn get_update_handler() -> UpdateHandler<teloxide::RequestError> {
    Update::filter_message().endpoint(dispatch_message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::HandlerResult;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use teloxide_tests::{MockMessagePhoto, MockMessageText};

    #[test]
    fn text_routes_by_first_token() {
        let msg = MockMessageText::new().text("/qr hello world").build();
        assert_eq!(classify(&msg), Some(Route::Text("/qr".to_owned())));
    }

    #[test]
    fn bare_text_routes_by_full_string() {
        let msg = MockMessageText::new().text("/id").build();
        assert_eq!(classify(&msg), Some(Route::Text("/id".to_owned())));
    }

    #[test]
    fn repeated_separators_are_collapsed() {
        let msg = MockMessageText::new().text("   /wttr   a   b ").build();
        assert_eq!(classify(&msg), Some(Route::Text("/wttr".to_owned())));
    }

    #[test]
    fn blank_text_is_dropped() {
        let msg = MockMessageText::new().text("   ").build();
        assert_eq!(classify(&msg), None);
    }

    #[test]
    fn photo_caption_is_trimmed() {
        let msg = MockMessagePhoto::new().caption("  /qr  ").build();
        assert_eq!(classify(&msg), Some(Route::PhotoCaption("/qr".to_owned())));
    }

    #[test]
    fn photo_without_caption_is_dropped() {
        let msg = MockMessagePhoto::new().build();
        assert_eq!(classify(&msg), None);
    }

    fn counting(
        counter: Arc<AtomicUsize>,
    ) -> impl Fn(
        Bot,
        Message,
        CancellationToken,
    ) -> std::pin::Pin<Box<dyn std::future::Future<Output = HandlerResult> + Send>>
    + Send
    + Sync
    + 'static {
        move |_bot, _msg, _shutdown| {
            let counter = counter.clone();
            Box::pin(async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(())
            })
        }
    }

    #[tokio::test]
    async fn photo_caption_never_consults_text_table() {
        let text_hits = Arc::new(AtomicUsize::new(0));
        let photo_hits = Arc::new(AtomicUsize::new(0));

        let mut registry = CommandRegistry::new();
        registry.register_text("/qr", counting(text_hits.clone()));
        registry.register_photo("/qr", counting(photo_hits.clone()));
        let registry = Arc::new(registry);

        let msg = MockMessagePhoto::new().caption("/qr").build();
        dispatch_message(
            Bot::new("123:fake"),
            msg,
            registry.clone(),
            CancellationToken::new(),
        )
        .await
        .unwrap();

        assert_eq!(text_hits.load(Ordering::SeqCst), 0);
        assert_eq!(photo_hits.load(Ordering::SeqCst), 1);

        let msg = MockMessageText::new().text("/qr payload").build();
        dispatch_message(Bot::new("123:fake"), msg, registry, CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(text_hits.load(Ordering::SeqCst), 1);
        assert_eq!(photo_hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn unknown_command_is_a_silent_no_op() {
        let hits = Arc::new(AtomicUsize::new(0));
        let mut registry = CommandRegistry::new();
        registry.register_text("/id", counting(hits.clone()));

        let msg = MockMessageText::new().text("/unknown").build();
        dispatch_message(
            Bot::new("123:fake"),
            msg,
            Arc::new(registry),
            CancellationToken::new(),
        )
        .await
        .unwrap();

        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }
}
