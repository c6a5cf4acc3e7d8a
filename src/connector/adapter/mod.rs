mod in_memory_credential_store;
mod json_credential_store;
mod openai_chat_client;
mod scripted_chat_client;

pub use in_memory_credential_store::*;
pub use json_credential_store::*;
pub use openai_chat_client::*;
pub use scripted_chat_client::*;
