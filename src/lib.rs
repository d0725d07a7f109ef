//! # Simple and type-safe client for the USPS Web Tools address APIs.
//!
//! Implements an easy-to-use client for the [Web Tools] address
//! verification, ZIP code lookup and city/state lookup APIs. Requests are
//! built from typed address fields and responses are parsed into
//! [`AddressRecord`]s keyed by their position in the request.
//!
//! ## Examples
//!
//! ```no_run
//! use webtools::{AddressInput, Client, Field};
//!
//! let client = Client::builder()
//!     .user_id("<USERID>")
//!     .build()
//!     .unwrap();
//!
//! let address = AddressInput::new()
//!     .with(Field::Address2, "6406 Ivy Lane")
//!     .with(Field::City, "Greenbelt")
//!     .with(Field::State, "MD");
//!
//! let results = client.zipcode_lookup(&[address]).unwrap();
//! println!("{}", results.get("0").unwrap());
//! ```
//!
//! [Web Tools]: https://www.usps.com/business/web-tools-apis/

pub mod address;
mod client;
mod errors;
mod operation;
mod payload;
pub mod response;

pub use address::{AddressInput, AddressRecord, Field};
pub use client::*;
pub use errors::*;
pub use operation::*;
pub(crate) use payload::*;
pub use response::ResultSet;
