mod chat_client;
mod credential_store;
mod lookup_presenter;

pub use chat_client::*;
pub use credential_store::*;
pub use lookup_presenter::*;
