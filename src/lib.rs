// Library for tests to access modules

pub mod auth;
pub mod bootstrap;
pub mod config;
pub mod db;
pub mod device_repo;
pub mod forms;
pub mod interfaces;
pub mod models;
pub mod routes;
pub mod session_repo;
pub mod session_sweeper;
pub mod user_repo;
pub mod views;
pub mod wol;
