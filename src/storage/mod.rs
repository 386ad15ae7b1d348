//! Storage backends implementing the order store contract.

pub mod in_memory;

#[cfg(feature = "mongodb_backend")]
pub mod connection;
#[cfg(feature = "mongodb_backend")]
pub mod mongodb;

pub use in_memory::InMemoryOrderStore;

#[cfg(feature = "mongodb_backend")]
pub use connection::SharedMongoClient;
#[cfg(feature = "mongodb_backend")]
pub use self::mongodb::MongoOrderStore;
