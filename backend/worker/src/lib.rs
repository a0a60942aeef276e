pub mod worker;

pub use worker::{BatchSummary, DocumentReport, Worker};
