//! Error types for SCML conversion

use std::io;
use thiserror::Error;

/// Result type alias for SCML operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that abort an SCML conversion
///
/// Missing atlas frames are not represented here: they only skip a single
/// sprite placement and are reported through `log::warn!`.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error occurred
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The node tree could not be deserialized
    #[error("Invalid node tree: {0}")]
    Json(#[from] serde_json::Error),

    /// An attribute holds a value that cannot be parsed as the expected type
    #[error("Malformed attribute '{attribute}' on {element}: '{value}'")]
    MalformedAttribute {
        element: String,
        attribute: String,
        value: String,
    },

    /// A required attribute without a default is absent
    #[error("Missing required attribute '{attribute}' on {element}")]
    MissingAttribute { element: String, attribute: String },

    /// A required child element is absent
    #[error("Missing <{child}> element in {element}")]
    MissingElement { element: String, child: String },

    /// A bone timeline is never referenced by the mainline
    #[error(
        "Bone timeline '{timeline}' in {entity}/{animation} has no bone reference on the mainline"
    )]
    MissingBoneReference {
        entity: String,
        animation: String,
        timeline: String,
    },

    /// The first key of a sprite timeline is never referenced by the mainline
    #[error(
        "Sprite timeline '{timeline}' in {entity}/{animation} has no object reference for its first key"
    )]
    MissingObjectReference {
        entity: String,
        animation: String,
        timeline: String,
    },

    /// The bone parent graph contains a cycle
    #[error("Bone {bone} in {entity}/{animation} is part of a parent cycle")]
    BoneCycle {
        entity: String,
        animation: String,
        bone: i32,
    },

    /// A duration directive in an atlas file name names no frame
    #[error("Invalid duration directive in atlas file '{file}' of folder '{folder}'")]
    InvalidDuration { folder: String, file: String },

    /// Conversion settings are unusable
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl Error {
    /// Create a malformed attribute error
    pub fn malformed(
        element: impl Into<String>,
        attribute: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self::MalformedAttribute {
            element: element.into(),
            attribute: attribute.into(),
            value: value.into(),
        }
    }

    /// Create a missing attribute error
    pub fn missing_attribute(element: impl Into<String>, attribute: impl Into<String>) -> Self {
        Self::MissingAttribute {
            element: element.into(),
            attribute: attribute.into(),
        }
    }

    /// Create a missing element error
    pub fn missing_element(element: impl Into<String>, child: impl Into<String>) -> Self {
        Self::MissingElement {
            element: element.into(),
            child: child.into(),
        }
    }
}
