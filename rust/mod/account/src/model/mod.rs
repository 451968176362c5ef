mod role;
mod session;
mod user;

pub use role::*;
pub use session::*;
pub use user::*;
