// Domain layer: core models and ports (interfaces). No dependencies on the
// HTTP adapters; serde only where the models cross a wire or a file.

pub mod model;
pub mod ports;
