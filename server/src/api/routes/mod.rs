//! API and storefront route handlers

pub mod admin;
pub mod attributes;
pub mod health;
pub mod shop;
