// Favorite service module
// Shared favorite-event set read by the app and its widgets

mod reload;
mod store;

pub use reload::{last_reload, MarkerFileReloader, NoopReloader, TimelineReloader};
pub use store::FavoriteStore;

use crate::config::AppConfig;
use crate::services::database::SharedContainer;

/// Favorite identifiers for a widget refresh. Widgets run on tight budgets,
/// so an unavailable or corrupt container reads as an empty set.
pub fn load_widget_favorites(config: &AppConfig) -> Vec<String> {
    let container = match SharedContainer::from_config(config) {
        Ok(container) => container,
        Err(err) => {
            log::warn!("Widget favorites unavailable: {}", err);
            return Vec::new();
        }
    };

    match container.open_database(config.busy_timeout()) {
        Ok(db) => FavoriteStore::without_reload(db).favorite_identifiers_or_empty(),
        Err(err) => {
            log::warn!("Widget favorites unavailable: {}", err);
            Vec::new()
        }
    }
}
