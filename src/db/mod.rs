pub mod connection;

pub use connection::{
    create_connection_pool, create_lazy_pool, health_check, run_migrations, DatabaseError,
    DatabasePool,
};
