mod load_credential;
mod lookup_session;
mod run_lookup;
mod save_credential;

pub use load_credential::*;
pub use lookup_session::*;
pub use run_lookup::*;
pub use save_credential::*;
