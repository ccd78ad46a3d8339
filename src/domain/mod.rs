// Domain layer: catalog value types and the ports the core depends on.

pub mod model;
pub mod ports;
