//! Services: typed CRUD over the safe SQL builder.

mod crud;
mod doctor;
mod location;
mod lookup;
mod validation;
pub use doctor::DoctorService;
pub use location::LocationService;
pub use lookup::LookupService;
pub use validation::{RequestValidator, WriteMode};
