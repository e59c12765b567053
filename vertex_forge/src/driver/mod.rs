/// Driver module - the backend boundary and its in-memory implementation

// Module declarations
pub mod driver;
pub mod headless_driver;

// Re-export everything from driver.rs
pub use driver::*;

// Re-export the headless backend
pub use headless_driver::{HeadlessDriver, BoundAttribute, DriverStats};
