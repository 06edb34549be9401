// Candidate matching core: normalize → score → rank → export.
// Pure and stateless; I/O lives in sources/ and exports.rs.

pub mod export;
pub mod handlers;
pub mod models;
pub mod normalize;
pub mod ranker;
pub mod scorer;
