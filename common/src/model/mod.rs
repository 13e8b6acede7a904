pub mod datasource;
pub mod mapping;
