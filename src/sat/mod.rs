//! The SAT test-center page: seat availability fetched from the functions
//! backend, grouped by normalized city.

mod client;
mod normalize;
mod page;

pub use page::{SatState, get_sat_page};
