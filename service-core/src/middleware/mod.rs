pub mod function_key;
pub mod metrics;
pub mod security_headers;
pub mod tracing;
