//! Shared types and pure helpers for the Sora video-job nodes.
//!
//! Holds the normalized response [`envelope::Envelope`], the field-probing
//! helpers used to pull job ids and statuses out of loosely-typed JSON,
//! payload decoding (Base64, data URIs, extra form fields), and the
//! temp-file writer used for downloaded results.

pub mod envelope;
pub mod error;
pub mod fields;
pub mod payload;
pub mod status;
pub mod storage;
