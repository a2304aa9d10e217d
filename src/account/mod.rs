pub mod memory;
pub mod model;
pub mod mysql_store;
pub mod service;
pub mod store;

pub use memory::InMemoryAccountStore;
pub use model::{Account, PublicAccount};
pub use mysql_store::MySqlAccountStore;
pub use service::{AccountError, AccountService};
pub use store::{AccountStore, StoreError, UniqueField};
