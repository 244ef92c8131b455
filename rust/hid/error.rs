//! Error types for HID operations

use thiserror::Error;

/// Formats the optional native error text as a `": text"` suffix.
fn detail(message: &Option<String>) -> String {
    match message {
        Some(text) if !text.is_empty() => format!(": {}", text),
        _ => String::new(),
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HidError {
    #[error("Unable to load the hidapi library (tried: {tried})")]
    LibraryNotFound { tried: String },

    #[error("hidapi library is missing symbol {symbol}: {reason}")]
    MissingSymbol { symbol: String, reason: String },

    #[error("hid_init failed with code {0}")]
    Init(i32),

    #[error("Invalid device record: {0}")]
    InvalidRecord(&'static str),

    #[error("Failed to open device: HIDDevice already open")]
    AlreadyOpen,

    #[error("HIDDevice not open")]
    NotOpen,

    #[error("Failed to open device {path}{}", detail(.message))]
    Open {
        path: String,
        message: Option<String>,
    },

    #[error("Failed to write to HID device: {code}{}", detail(.message))]
    Write { code: i32, message: Option<String> },

    #[error("Failed to read from HID device: {code}{}", detail(.message))]
    Read { code: i32, message: Option<String> },

    #[error("Failed to set non-blocking mode: {code}{}", detail(.message))]
    SetNonblocking { code: i32, message: Option<String> },

    #[error("Feature report transfer failed: {code}{}", detail(.message))]
    FeatureReport { code: i32, message: Option<String> },

    #[error("String query failed: {code}{}", detail(.message))]
    StringQuery { code: i32, message: Option<String> },
}

pub type Result<T> = std::result::Result<T, HidError>;
