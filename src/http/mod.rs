/// HTTP binding for the habit service
///
/// This module maps JSON-over-HTTP requests onto the service operations:
/// routing, body decoding, status codes, and CORS.

pub mod server;

pub use server::HttpServer;
