mod result_set;
mod row;
mod rows;

pub use result_set::ResultSet;
pub use row::CustomDbRow;
pub use rows::{AssocRow, Rows};
