//! Custom error types for the Gallery Relay application
//!
//! This module defines custom error types and implements the necessary traits
//! to properly handle errors throughout the application.

use std::fmt;

use crate::client::FetchError;

/// Main error type for the Gallery Relay application
#[derive(Debug)]
pub enum GalleryError {
    /// Error occurred during an I/O operation (config read, socket bind)
    Io(std::io::Error),

    /// Error occurred while parsing the configuration file
    ConfigParse(json5::Error),

    /// The configured collection API base URL is not a valid URL
    BaseUrl(url::ParseError),

    /// Error returned by the remote collection client
    Fetch(FetchError),

    /// Generic error with a message
    Generic(String),
}

impl fmt::Display for GalleryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GalleryError::Io(e) => {
                write!(f, "I/O error: {e}")
            }
            GalleryError::ConfigParse(e) => {
                write!(f, "Failed to parse configuration: {e}")
            }
            GalleryError::BaseUrl(e) => {
                write!(f, "Invalid collection API base URL: {e}")
            }
            GalleryError::Fetch(e) => {
                write!(f, "Collection API request failed: {e}")
            }
            GalleryError::Generic(msg) => {
                write!(f, "Error: {msg}")
            }
        }
    }
}

impl std::error::Error for GalleryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GalleryError::Io(e) => Some(e),
            GalleryError::ConfigParse(e) => Some(e),
            GalleryError::BaseUrl(e) => Some(e),
            GalleryError::Fetch(e) => Some(e),
            GalleryError::Generic(_) => None,
        }
    }
}

impl From<std::io::Error> for GalleryError {
    fn from(error: std::io::Error) -> Self {
        GalleryError::Io(error)
    }
}

impl From<json5::Error> for GalleryError {
    fn from(error: json5::Error) -> Self {
        GalleryError::ConfigParse(error)
    }
}

impl From<url::ParseError> for GalleryError {
    fn from(error: url::ParseError) -> Self {
        GalleryError::BaseUrl(error)
    }
}

impl From<FetchError> for GalleryError {
    fn from(error: FetchError) -> Self {
        GalleryError::Fetch(error)
    }
}

/// Result type alias using our custom error type
pub type Result<T> = std::result::Result<T, GalleryError>;
