pub mod discord;
pub mod sender;
