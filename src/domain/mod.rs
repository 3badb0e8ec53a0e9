// Domain layer: core models, ports (interfaces) and the pure services built on them.
// Nothing in here touches the filesystem.

pub mod model;
pub mod ports;

pub mod services;
