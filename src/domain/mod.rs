// Domain layer: record types and the column mapping. No file I/O here.

pub mod mapping;
pub mod model;
