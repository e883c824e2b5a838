pub mod ports;

pub use ports::ReferenceLookup;
