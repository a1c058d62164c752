pub mod api_client;
pub mod chat;
pub mod conflicts;
pub mod dashboard;
pub mod documents;
pub mod error;
pub mod filters;
pub mod progress;
pub mod routes;
pub mod scope;
pub mod store;
pub mod upload;
