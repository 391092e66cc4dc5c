// Client library for the Zillow property web service

pub mod client;
pub mod config;
pub mod error;
pub mod projection;
pub mod xml_tree;

// Re-export key types for convenience
pub use client::{
    classify_response, BlockingZillowClient, Endpoint, PropertyApi, Query, ZillowClient,
};
pub use config::{ClientConfig, DEFAULT_BASE_URL, DEFAULT_USER_AGENT};
pub use error::{
    status_message, ClientError, ZillowError, STATUS_MESSAGES, SUCCESS_CODE, UNKNOWN_STATUS,
};
pub use projection::{
    DeepSearchResult, Field, FieldSource, Projection, PropertyRecord, UpdatedPropertyDetails,
};
pub use xml_tree::{XmlElement, XmlError};
