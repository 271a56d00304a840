pub mod card;
pub mod class;
pub mod payment;
pub mod user;

pub use card::*;
pub use class::*;
pub use payment::*;
pub use user::*;
