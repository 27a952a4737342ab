pub mod calendar_selection;
pub mod countdown;
pub mod database;
pub mod event_feed;
pub mod favorite;
pub mod settings;
