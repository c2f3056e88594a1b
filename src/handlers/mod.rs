mod help;
mod id;
mod qr_decode;
mod qr_encode;
mod qr_wifi;
mod wttr;

pub use help::help;
pub use id::id;
pub use qr_decode::qr_decode;
pub use qr_encode::qr_encode;
pub use qr_wifi::qr_wifi;
pub use wttr::wttr;

use std::sync::Arc;

use crate::config::AppConfig;
use crate::registry::CommandRegistry;

/// Builds the registry with every built-in command. Called once at startup;
/// the registry is read-only afterwards.
pub fn default_registry(cfg: Arc<AppConfig>) -> CommandRegistry {
    let mut registry = CommandRegistry::new();

    registry.register_text("/id", id);
    registry.register_text("/help", help);
    registry.register_text("/qr", qr_encode);
    registry.register_text("/qrwifi", qr_wifi);
    registry.register_text("/wttr", move |bot, msg, shutdown| {
        wttr(bot, msg, shutdown, cfg.clone())
    });

    registry.register_photo("/qr", qr_decode);

    registry
}
