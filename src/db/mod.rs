mod connection;
mod queries;
mod schema;

pub use connection::Database;
