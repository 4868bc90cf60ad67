//! Implementations of the [`CommandRunner`](crate::ports::runner::CommandRunner) port.
//!
//! The mock implementation is the [`Interceptor`](crate::interceptor::Interceptor).

pub mod live;
pub mod recording;
