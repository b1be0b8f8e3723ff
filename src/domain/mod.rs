// Domain layer: row/summary models and the ports the reports and server depend on.

pub mod model;
pub mod ports;
