pub mod client;
pub mod http_client;
pub mod login;
pub mod payment_means;
