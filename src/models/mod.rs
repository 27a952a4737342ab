// Module exports for models

pub mod event;
pub mod favorite;
pub mod settings;
pub mod time_gap;
