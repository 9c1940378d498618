pub mod http;
pub mod sources;
