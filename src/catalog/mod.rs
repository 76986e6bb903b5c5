//! Recipe catalog storage.
//!
//! The catalog holds the candidate recipes the engine ranks. An embedded
//! catalog of everyday Japanese home cooking is compiled into the binary;
//! custom catalogs can be loaded from JSON files in the same format.
//!
//! ## Example
//!
//! ```rust,no_run
//! use pantry_match::RecipeCatalog;
//! use pantry_match::core::recipe::RecipeId;
//!
//! let catalog = RecipeCatalog::load_embedded().unwrap();
//!
//! for recipe in &catalog {
//!     println!("{}: {}", recipe.id, recipe.title);
//! }
//!
//! let nikujaga = catalog.get(&RecipeId::new("nikujaga"));
//! ```
//!
//! ## Custom Catalogs
//!
//! ```rust,no_run
//! use pantry_match::RecipeCatalog;
//! use std::path::Path;
//!
//! let catalog = RecipeCatalog::load_embedded().unwrap();
//! let json = catalog.to_json().unwrap();
//!
//! let custom = RecipeCatalog::load_from_file(Path::new("my_recipes.json")).unwrap();
//! ```

pub mod store;
