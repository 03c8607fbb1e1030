//! Infrastructure layer: Postgres store, RabbitMQ messaging, configuration.

pub mod config;
pub mod event_bus;
pub mod shutdown;
pub mod store;

pub use config::{ConfigError, NotificationsConfig, ProductsConfig};
pub use event_bus::{AmqpError, RabbitPublisher};
pub use store::PostgresProductRepository;
