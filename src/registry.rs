use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt};
use teloxide::prelude::*;
use tokio_util::sync::CancellationToken;

use crate::error::HandlerError;

pub type HandlerResult = Result<(), HandlerError>;

/// A registered command handler: one asynchronous unit of work bound to a
/// command string, invoked with the bot client, the triggering message and a
/// shutdown token.
pub type Handler =
    Arc<dyn Fn(Bot, Message, CancellationToken) -> BoxFuture<'static, HandlerResult> + Send + Sync>;

/// Two command tables, one keyed by the first token of a text message and one
/// keyed by the full trimmed caption of a photo message.
///
/// Populated once at startup via the `register_*` calls and read-only
/// afterwards. Inserting the same command twice overwrites the previous
/// handler (last registration wins). Lookups for unknown commands return
/// `None`; that is the expected outcome for most chat traffic.
#[derive(Default)]
pub struct CommandRegistry {
    text: HashMap<String, Handler>,
    photo: HashMap<String, Handler>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_text<F, Fut>(&mut self, command: &str, handler: F)
    where
        F: Fn(Bot, Message, CancellationToken) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult> + Send + 'static,
    {
        self.text.insert(command.to_owned(), wrap(handler));
    }

    pub fn register_photo<F, Fut>(&mut self, command: &str, handler: F)
    where
        F: Fn(Bot, Message, CancellationToken) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult> + Send + 'static,
    {
        self.photo.insert(command.to_owned(), wrap(handler));
    }

    pub fn text_handler(&self, command: &str) -> Option<&Handler> {
        self.text.get(command)
    }

    pub fn photo_handler(&self, command: &str) -> Option<&Handler> {
        self.photo.get(command)
    }
}

fn wrap<F, Fut>(handler: F) -> Handler
where
    F: Fn(Bot, Message, CancellationToken) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = HandlerResult> + Send + 'static,
{
    Arc::new(move |bot, msg, shutdown| handler(bot, msg, shutdown).boxed())
}
