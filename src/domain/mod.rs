// Domain layer: core models and ports (interfaces). No HTTP or upstream details here.

pub mod model;
pub mod ports;
