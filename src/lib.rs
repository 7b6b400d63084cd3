#![warn(missing_docs)]

//! # unapi: unAPI client for bibliographic union catalogs
//!
//! Fetches single records from an unAPI endpoint (by default the K10plus
//! catalog at <https://unapi.k10plus.de>) and reads PICA JSON and MARC JSON
//! records through typed accessors.
//!
//! ## Quick Start
//!
//! ### Reading a record
//!
//! ```ignore
//! use unapi::PicaJson;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let pica = PicaJson::from_json_str(r#"[
//!     ["003@", null, "0", "1234567890"],
//!     ["001B", null, "0", "1999:03-01-24", "t", "14:22:31.000"]
//! ]"#)?;
//!
//! assert_eq!(pica.ppn().as_deref(), Some("1234567890"));
//! assert_eq!(pica.latest_change_iso()?.as_deref(), Some("2024-01-03T14:22:31"));
//! # Ok(())
//! # }
//! ```
//!
//! ### Fetching a record
//!
//! ```ignore
//! use unapi::{Client, ClientConfig, Encoding};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Client::new(ClientConfig::default())?;
//! let record = client.request_record("1234567890", Encoding::PicaJson)?;
//! println!("{:?}", record.holdings_from_isil("DE-14"));
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`record`]: Field rows and records as decoded from JSON
//! - [`field_index`]: Tag to row position index
//! - [`subfield`]: Subfield extraction with repeat and collapse policies
//! - [`accessor`]: Generic tag/subfield access over an indexed record
//! - [`derive`]: Cross-referencing, composite splitting and date parsing
//! - [`picajson`]: PICA JSON accessors
//! - [`marcjson`]: MARC JSON accessors
//! - [`schema`]: Choosing the accessor for an unAPI schema
//! - [`report`]: Reporting of missing fields and cardinality mismatches
//! - [`client`]: unAPI client
//! - [`formats`]: unAPI format list
//! - [`transport`]: HTTP transport
//! - [`pretty`]: Pretty printing of responses
//! - [`config`]: Client and holdings configuration
//! - [`error`]: Error types and result type

pub mod accessor;
pub mod client;
pub mod config;
pub mod derive;
pub mod error;
pub mod field_index;
pub mod formats;
pub mod marcjson;
pub mod picajson;
pub mod pretty;
pub mod record;
pub mod report;
pub mod schema;
pub mod subfield;
pub mod transport;

pub use accessor::{FieldMatch, RecordAccessor, ValueQuery};
pub use client::{Client, Response};
pub use config::{ClientConfig, HoldingsScope};
pub use error::{Result, UnapiError};
pub use field_index::FieldIndex;
pub use formats::{FormatInfo, ResponseKind};
pub use marcjson::MarcJson;
pub use picajson::PicaJson;
pub use record::{Element, FieldRow, Record};
pub use report::{Condition, ConditionKind, MemoryReporter, Reporter, Severity, TracingReporter};
pub use schema::{Encoding, SchemaRecord};
pub use subfield::{Extracted, SubfieldExtractor};
#[cfg(feature = "http")]
pub use transport::HttpTransport;
pub use transport::{HttpResponse, Transport};
