pub mod entities;
pub mod value_objects;

pub use entities::{
    CandidateCity, CoordinatesDetails, CoordinatesSource, GovernorDetails, GovernorSource,
    NewCoordinates, NewGovernor,
};
pub use value_objects::{Climate, Government};
