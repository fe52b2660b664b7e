//! Outbound notification (alimtalk) gateway.
//!
//! The confirm link for a manuscript batch reaches the advertiser as a chat
//! message sent through an external provider. This crate defines the
//! [`NotificationGateway`] trait the rest of the platform programs against,
//! the message templates, a production Bizgo adapter, a console stub for
//! development, and the sequential bulk [`Dispatcher`] with per-recipient
//! failure tracking.

pub mod bizgo;
pub mod console;
pub mod dispatch;
pub mod gateway;
pub mod message;

pub use bizgo::{BizgoConfig, BizgoGateway};
pub use console::ConsoleGateway;
pub use dispatch::{BulkReport, Dispatcher, RecipientResult};
pub use gateway::{NotificationGateway, NotifyError};
pub use message::{MessageKind, OutboundMessage};
