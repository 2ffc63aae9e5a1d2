pub mod api_client;
mod http_backend;
