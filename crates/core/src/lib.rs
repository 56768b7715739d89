//! Domain types for the leadgate backend
//!
//! Features:
//! - Lead records with status/source enums
//! - Extracted contact records with field caps
//! - Chat session and message records
//! - Notification payload shared by all outbound channels

pub mod chat;
pub mod contact;
pub mod lead;
pub mod notification;

pub use chat::{ChatMessage, ChatSession};
pub use contact::ContactRecord;
pub use lead::{Lead, LeadSource, LeadStatus, NewLead};
pub use notification::LeadNotification;
