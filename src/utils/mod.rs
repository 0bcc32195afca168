pub mod constants;
pub mod normalize;
pub mod query;
