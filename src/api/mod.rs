pub mod client;
pub mod models;

pub use client::ApiClient;
pub use models::{
    parse_feed_time, AffectedArea, EewPayload, EewRecord, Grade, QuakePayload, QuakeRecord,
    TsunamiPayload, TsunamiRecord,
};
