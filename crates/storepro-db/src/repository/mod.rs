//! # Repository Module
//!
//! Database repository implementations for StorePro.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern Explained                         │
//! │                                                                         │
//! │  The Repository pattern abstracts database access behind a clean API.  │
//! │                                                                         │
//! │  Terminal session                                                       │
//! │       │                                                                 │
//! │       │  db.products().get_by_sku("FC-001")                             │
//! │       │  db.sales().save_sale_atomic(&new_sale)                         │
//! │       ▼                                                                 │
//! │  Repository (SQL isolated here)                                         │
//! │       ▼                                                                 │
//! │  SQLite Database                                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`product::ProductRepository`] - Catalog lookups and price updates
//! - [`sale::SaleRepository`] - Atomic sale commit and day-window queries

pub mod product;
pub mod sale;
