//! # stockline-client: REST Boundary for Stockline
//!
//! Talks to the inventory backend and drives the core engines with what
//! it returns.
//!
//! ## Data Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   ┌──────────────┐   Backend trait    ┌──────────────────────────────┐  │
//! │   │ PosSession   │◄──────────────────►│ HttpBackend (reqwest)        │  │
//! │   │ OrderDesk    │                    │  └── wire: typed decode      │  │
//! │   └──────┬───────┘                    └──────────────┬───────────────┘  │
//! │          │                                           │                  │
//! │          ▼                                           ▼                  │
//! │   stockline-core                              REST backend              │
//! │   (CatalogStore, PosEngine, OrderDraft)       (inventory, orders,       │
//! │                                                sales, analytics)        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`backend`] - The `Backend` trait
//! - [`http`] - `reqwest` implementation of `Backend`
//! - [`wire`] - Request/response bodies and checked decoding
//! - [`session`] - Catalog + cart for one register
//! - [`orders`] - Supplier order list and new orders
//! - [`config`] - TOML + environment configuration
//! - [`error`] - Client error types

pub mod backend;
pub mod config;
pub mod error;
pub mod http;
pub mod orders;
pub mod session;
pub mod wire;

pub use backend::Backend;
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use http::HttpBackend;
pub use orders::OrderDesk;
pub use session::{CompletedSale, PosSession};
