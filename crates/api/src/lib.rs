//! HTTP surface of the shop inventory service.

pub mod app;
