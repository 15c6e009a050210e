//! # REST Endpoints
//!
//! Typed wrappers over [`ApiClient`](crate::ApiClient), one module per
//! backend resource. Each adds `impl ApiClient` methods and owns the wire
//! DTOs for its resource.
//!
//! ```text
//! ┌──────────────┬──────────────────────────────────────────────────────────┐
//! │  module      │  routes                                                  │
//! ├──────────────┼──────────────────────────────────────────────────────────┤
//! │  auth        │  POST auth/login, POST auth/logout, GET auth/me          │
//! │  stores      │  GET stores                                              │
//! │  register    │  POST register/open, POST register/{id}/close,           │
//! │              │  GET register/active?storeId=                            │
//! │  accounts    │  GET accounts?storeId=, POST accounts/{id}/withdrawals   │
//! │  sales       │  POST sales                                              │
//! │  users       │  GET users, POST users, GET roles                        │
//! │  patients    │  GET patients?page=&pageSize=&search=                    │
//! └──────────────┴──────────────────────────────────────────────────────────┘
//! ```
//!
//! Amounts travel as decimal numbers and become [`Money`](medidash_core::Money)
//! at this boundary.

pub mod accounts;
pub mod auth;
pub mod patients;
pub mod register;
pub mod sales;
pub mod stores;
pub mod users;
