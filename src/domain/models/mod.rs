mod credential;
mod lookup;

pub use credential::*;
pub use lookup::*;
