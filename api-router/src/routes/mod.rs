pub mod images;
pub mod liveness;
pub mod readiness;
pub mod upload;
