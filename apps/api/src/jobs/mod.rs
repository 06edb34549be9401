// Job description intake: upload, analysis, listing.

pub mod handlers;
pub mod repository;
