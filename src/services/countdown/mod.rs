mod service;

pub use service::{CountdownService, EventCountdown};
