// Domain layer: catalog records, derived geometry, and the ports the engine talks through.

pub mod model;
pub mod ports;
