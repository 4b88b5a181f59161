mod client;
mod phone;

pub use client::{Client, ClientLookup, ClientRecord, ClientUpdate};
pub use phone::Phone;
