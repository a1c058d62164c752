pub mod changes;
pub mod chat;
pub mod common;
pub mod dashboard;
pub mod documents;
pub mod health;
pub mod navigation;
pub mod relationships;
