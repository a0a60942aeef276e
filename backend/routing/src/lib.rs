pub mod router;
pub mod signal;

pub use router::{classify, OcrRouter, RouteDecision};
pub use signal::FileSizeSignal;
