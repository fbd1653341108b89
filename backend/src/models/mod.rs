pub mod congestion;
pub mod geo;
pub mod traffic;

pub use congestion::*;
pub use geo::*;
pub use traffic::*;
