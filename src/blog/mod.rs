pub mod client;
#[cfg(test)]
pub mod fake;
pub mod gateway;
pub mod queries;
pub mod types;

pub use client::BlogClient;
pub use gateway::ArticleGateway;
