pub mod bird;
pub mod booking;
pub mod vertiport;
