pub mod issues;
pub mod record;
