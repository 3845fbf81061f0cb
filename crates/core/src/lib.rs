//! Core types for abnormal trading surveillance.
//!
//! Records, the read-only record table, generic export tables, the caller
//! error taxonomy, and layered configuration.

pub mod config;
pub mod config_loader;
pub mod error;
pub mod record;
pub mod record_table;
pub mod table;

pub use config::{AppConfig, ColumnNames, DataConfig, ExportConfig, IndicatorConfig};
pub use config_loader::ConfigLoader;
pub use error::CoreError;
pub use record::{AlertCategory, DateRange, PriceRecord};
pub use record_table::RecordTable;
pub use table::{Cell, Table};
