pub mod api_key;
pub mod response;
pub mod server;
pub mod shutdown;
