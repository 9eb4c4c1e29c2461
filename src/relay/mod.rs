//! Contact-form relay: turns a submission into an email to the site owner.

pub mod contact;
pub mod message;
pub mod outcome;
pub mod submission;
pub mod transport;

pub use contact::ContactRelay;
pub use message::ContactEmail;
pub use outcome::{ContactResponse, Outcome};
pub use submission::{Submission, ValidSubmission, ValidationFailure};
pub use transport::{MailTransport, SmtpMailer};
