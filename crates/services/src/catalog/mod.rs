mod data;
mod service;

pub use service::CatalogService;
