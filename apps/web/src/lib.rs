//! Browser-side contact form controller, independent of any UI toolkit.
//!
//! The host page implements [`FormView`] and picks a [`SubmissionTransport`]:
//! either direct provider dispatch or a POST to the submission endpoint.

pub mod controller;
pub mod fallback;
pub mod journal;
pub mod transport;
pub mod view;

pub use controller::{Capabilities, ContactController, ControllerConfig, SubmitOutcome};
pub use journal::{ContactJournal, JournalEntry, JournalSummary};
pub use transport::{Delivery, DirectTransport, EndpointTransport, SubmissionTransport, TransportError};
pub use view::{AlertKind, FormView};
