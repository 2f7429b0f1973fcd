pub mod alias;
pub mod cast;
pub mod error;
pub mod schema;
pub mod value;

pub use alias::*;
pub use cast::*;
pub use error::*;
pub use schema::*;
pub use value::*;
