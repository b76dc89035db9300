pub mod controller;
pub mod debounce;
pub mod draft;
pub mod error;
pub mod result;
pub mod sse;
pub mod transport;

#[cfg(test)]
mod tests;

pub use controller::{LookupController, LookupOptions};
pub use draft::{EntryDraft, NewEntry, Selectable};
pub use error::LookupError;
pub use sse::{EventReader, LookupEvent, SseDecoder, SseEvent};
pub use transport::{
    ByteStream, CredentialProvider, Credentials, HttpTransport, LookupTransport, StaticCredentials,
};
