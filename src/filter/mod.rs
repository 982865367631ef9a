pub mod criteria;
pub mod error;
pub mod filter_where;
pub mod types;

pub use criteria::FilterCriteria;
pub use error::FilterError;
pub use filter_where::FilterWhere;
pub use types::{Attribute, SqlResult};
