// Domain layer: core models and ports (interfaces). No map SDK or transport types here.

pub mod model;
pub mod ports;
