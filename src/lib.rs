//! Contact intelligence for a small CRM.
//!
//! The `intelligence` modules are pure functions over a contact snapshot.
//! `services` wires them to a `ContactStore`, a `RandomSource` and the
//! `EventHub` held in `AppState`.

pub mod db;
pub mod error;
pub mod intelligence;
mod migrations;
pub mod notification;
pub mod random;
pub mod services;
pub mod state;
pub mod types;
pub mod util;
