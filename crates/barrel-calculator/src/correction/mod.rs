//! Built-in correction factors making up the net volume chain.

pub mod api_gravity;
pub mod temperature;
pub mod water_cut;
