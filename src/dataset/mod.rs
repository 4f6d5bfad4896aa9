//! Dataset loading
//!
//! - **types**: Wide and tidy record types, `YearRange`
//! - **reshape**: CSV parsing, cell coercion and wide-to-tidy melting
//! - **table**: The immutable in-memory `TidyTable`
//! - **error**: Error types
//!
//! # Example
//!
//! ```rust,no_run
//! use gapminder_dash::dataset::TidyTable;
//!
//! let table = TidyTable::load("gdp_pcap.csv")?;
//! if let Some((min, max)) = table.year_bounds() {
//!     println!("{} countries, {}-{}", table.countries().len(), min, max);
//! }
//! # Ok::<(), gapminder_dash::dataset::DatasetError>(())
//! ```

pub mod error;
pub mod reshape;
pub mod table;
pub mod types;

pub use error::{DatasetError, DatasetResult};
pub use reshape::{coerce_value, reshape, WideTable, COUNTRY_COLUMN};
pub use table::TidyTable;
pub use types::{TidyRecord, WideRecord, YearRange};
