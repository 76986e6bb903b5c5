//! JSON API over the matching pipeline.
//!
//! ## Starting the Server
//!
//! ```text
//! # Start on default port 8080
//! pantry-match serve
//!
//! # Custom port and catalog
//! pantry-match serve --port 3000 --catalog my-recipes.json
//!
//! # Bind to all interfaces
//! pantry-match serve --address 0.0.0.0
//! ```
//!
//! ## API Endpoints
//!
//! - `POST /api/suggest` - Rank recipes for an inline inventory
//! - `GET /api/catalog` - List all recipes in the catalog
//! - `GET /api/normalize?name=` - Normalize one ingredient name
//! - `GET /health` - Liveness check

pub mod server;
