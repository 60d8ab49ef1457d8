// Domain layer: raw and normalized statement models, coercion rules, ports.

pub mod coerce;
pub mod model;
pub mod ports;
pub mod raw;
