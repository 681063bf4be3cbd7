//! # Kadai Core Library
//!
//! This library provides the core business logic for Kadai, a homework
//! tracker with LINE reminders. The HTTP server is a thin layer over this
//! crate; everything here runs without a network except the LINE clients
//! themselves.
//!
//! ## Architecture
//!
//! - **Scoring**: Pure functions turning a due date plus difficulty and
//!   importance into days-left, a priority score, and an urgency tier
//! - **Notify**: The eligibility engine deciding which items get a reminder
//!   today, plus the scheduler that fires it morning and evening
//! - **Storage**: SQLite-backed users, homework, and the append-only
//!   notification log; TOML-based configuration
//! - **Integrations**: LINE Messaging API push and LINE Login clients behind
//!   a small messenger trait
//!
//! ## Key Components
//!
//! - [`Database`]: Users, homework, and notification-log persistence
//! - [`Scorecard`]: Derived priority view of one homework item
//! - [`ReminderScheduler`]: Daily trigger loop over the eligibility engine
//! - [`Messenger`]: Trait for the message-delivery collaborator

pub mod error;
pub mod homework;
pub mod integrations;
pub mod notify;
pub mod scoring;
pub mod storage;

pub use error::{
    ConfigError, CoreError, DatabaseError, LoginError, MessengerError, ValidationError,
};
pub use homework::{
    Difficulty, Homework, HomeworkStatus, HomeworkUpdate, Importance, NewHomework,
    NotificationRecord, User,
};
pub use integrations::{LineLogin, LineMessenger, LineProfile, Messenger};
pub use notify::{MessageTemplate, PassSummary, ReminderOutcome, ReminderScheduler};
pub use scoring::{Scorecard, Urgency};
pub use storage::{Config, DashboardStats, Database};
