mod client;
pub mod history;

pub use self::history::{Api as HistoryService, HistoryApi};
