// Domain layer: Splynx records, lookup tables, circuits and the ports the pipeline talks through.

pub mod model;
pub mod ports;
