pub mod replicate;
pub mod row;
pub mod schema_gen;

pub use replicate::*;
pub use row::*;
pub use schema_gen::*;
