//! # Lifeguard Params
//!
//! Turns loosely-typed request parameters into backend-agnostic WHERE
//! conditions, and classifies SQL column type descriptors.
//!
//! - [`param`]: parameter normalization into [`Condition`] trees
//! - [`column_type`]: column type parsing, ranges, capacities and compatibility
//! - [`prepare`]: dates, JSON and custom values reduced to database scalars
//! - [`render`]: [`Condition`] into a `sea_query::Condition`
//! - [`batch`]: paged iteration descriptors over a `SelectStatement`
//!
//! ```
//! use lifeguard_params::{normalize, Condition};
//!
//! let condition = normalize("status", "active", "=", false, None);
//! assert_eq!(condition, Condition::equals("status", "active"));
//! ```

pub mod batch;
pub mod column_type;
pub mod config;
pub mod error;
pub mod param;
pub mod prepare;
pub mod render;

pub use column_type::{are_column_types_compatible, classify, Category, Classification, ColumnType};
pub use config::ParamsConfig;
pub use error::ParamError;
pub use param::{escape, normalize, unescape, BooleanPolicy, Condition, Normalizer, Operator, ParamValue, RawValue};
pub use prepare::{prepare_value_for_db, DbValue, PreparedValue};
