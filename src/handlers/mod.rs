pub mod booking;
pub mod fleet;
pub mod geocode;
pub mod policy;
pub mod trip;
