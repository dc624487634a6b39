pub(crate) mod csv;

pub use csv::{ExportError, export_telemetry};
