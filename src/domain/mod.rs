pub mod alphabet;
pub mod flight;
pub mod roller;
