pub mod analyzer;
pub mod intent;

pub use analyzer::{analyze_request, RequestKind};
pub use intent::{extract, strip_fences, Intent};
