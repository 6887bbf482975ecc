//! Concrete result shapes and polymorphic categories.
//!
//! Only the shapes used by the typed operations in `api` are modelled here;
//! every other reply is still reachable through [`Message`](crate::Message).

pub mod int64;

mod authorization;
mod common;
mod connection;
mod option;
mod proxy;
mod update;
mod username;

pub use authorization::*;
pub use common::*;
pub use connection::*;
pub use option::*;
pub use proxy::*;
pub use update::*;
pub use username::*;
