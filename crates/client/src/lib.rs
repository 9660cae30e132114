//! HTTP transport for the Sora video-job API.
//!
//! [`api::SoraApiClient`] performs the three exchanges the nodes need
//! (multipart job creation, job lookup, raw download) and normalizes every
//! outcome into a [`sora_core::envelope::Envelope`]. Transport errors never
//! escape as `Err`; they become failed envelopes.

pub mod api;
pub mod error;
pub mod request;
pub mod upload;
