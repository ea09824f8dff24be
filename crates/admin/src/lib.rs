//! CMS back-office HTTP surface: routing, forms, and request/response mapping.

pub mod app;
pub mod config;
pub mod context;
