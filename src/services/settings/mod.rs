mod mapper;
mod service;

pub use service::PreferencesService;
