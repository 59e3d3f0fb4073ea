//! RabbitMQ connectivity: connection establishment with bounded backoff and
//! the per-record publisher.

pub mod connection;
pub mod publisher;

pub use connection::{connect, BrokerConnection};
pub use publisher::Publisher;
