//! Domain types: doctors, their lookups (categories, specialities) and locations.

pub mod doctor;
pub mod location;
pub mod lookup;

pub use doctor::*;
pub use location::*;
pub use lookup::*;
