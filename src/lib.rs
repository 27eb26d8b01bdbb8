// Library for tests to access modules

pub mod collector;
pub mod config;
pub mod docker_repo;
pub mod health;
pub mod models;
pub mod series_store;
pub mod sources;
pub mod sysinfo_repo;
pub mod worker;
