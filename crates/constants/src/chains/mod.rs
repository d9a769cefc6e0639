/// Chain identifiers supported by the aggregation service.
pub mod ids;

/// Aggregation router deployments.
pub mod routers;
