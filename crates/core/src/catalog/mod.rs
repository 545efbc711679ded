pub mod record;
pub mod store;

pub use record::TechnologyRecord;
pub use store::CatalogStore;
