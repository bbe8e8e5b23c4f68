pub mod boundaries;
pub mod catalog;
pub mod coastline;
pub mod enrichment;

pub use boundaries::BoundaryRepository;
pub use catalog::CatalogRepository;
pub use coastline::CoastlineRepository;
pub use enrichment::EnrichmentRepository;
