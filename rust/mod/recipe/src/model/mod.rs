mod comment;
mod like;
mod rating;
mod recipe;
mod saved;

pub use comment::*;
pub use like::*;
pub use rating::*;
pub use recipe::*;
pub use saved::*;
