pub mod aggregate;
pub mod churn_queue;
pub mod config;
pub mod context;
pub mod dedup;
pub mod engine;
pub mod filter;
pub mod messages;
pub mod sender;
pub mod service;
pub mod unknown_block;
pub mod validator;

#[cfg(test)]
pub(crate) mod test_utils;
