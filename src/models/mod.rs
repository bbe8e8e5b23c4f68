pub mod entities;
pub mod requests;
pub mod responses;

pub use entities::{Achievement, AdminEntity, CoastSegment, Coordinates, Landmark, Rarity, Tier};
pub use requests::{
    BatchClassifyRequest, BatchLookupRequest, BoundariesQuery, BulkCountriesQuery,
    LandmarkListQuery, NearbyQuery, PointQuery, SquarePoint, TierListQuery,
};
pub use responses::{
    list_envelope, AchievementDefinition, BulkCountriesPayload, BulkCountry, ClassifyPayload,
    CoastDistancePayload, CountryPolygon, EnrichmentResult, NearbyLandmark, PointPayload,
    ResolvedBoundary, TierMatches,
};
