pub mod memory;
pub mod model;
pub mod mysql_store;
pub mod service;
pub mod store;

pub use memory::InMemoryPostStore;
pub use model::{Page, Post, PostPatch, PublicPost};
pub use mysql_store::MySqlPostStore;
pub use service::{PostError, PostService};
pub use store::PostStore;
