pub mod blocking;
pub mod mysql_adapter;
pub mod port;
