mod async_executor_strategy;
mod connection;

pub(crate) use async_executor_strategy::*;
pub(crate) use connection::*;
