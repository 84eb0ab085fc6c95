pub mod date_range;
pub mod trip;
pub mod user;
