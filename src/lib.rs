pub mod cli;
pub mod db;
pub mod store;
pub mod update;
pub mod verify;
