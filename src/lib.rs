pub mod auth;
pub mod cli;
pub mod database;
pub mod database_factory;
pub mod date_provider;
pub mod demo;
pub mod error;
pub mod maintenance;
pub mod models;
pub mod report_format;
pub mod row_factories;
pub mod storage;
pub mod views;
