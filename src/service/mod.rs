//! Catalog service
//!
//! Cache-aside reads and write-invalidate mutations over the catalog store.

mod catalog;
mod inventory;


pub use catalog::CatalogService;
