// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Basic authentication header codec.
//!
//! Every stage returns `None` on malformed input. A bad header is a normal
//! "no identity" outcome for the caller, not a fault.

use base64ct::{Base64, Encoding};

/// Scheme name used by HTTP Basic authentication.
pub const BASIC_SCHEME: &str = "Basic";

/// Email and password pair decoded from a Basic header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Credentials<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// Return the token following `"<scheme> "` in `header`.
///
/// The prefix match is case-sensitive.
pub fn extract_scheme<'a>(header: &'a str, scheme: &str) -> Option<&'a str> {
    header.strip_prefix(scheme)?.strip_prefix(' ')
}

/// Decode a standard (padded) base64 token into a UTF-8 string.
pub fn decode_base64(token: &str) -> Option<String> {
    let bytes = Base64::decode_vec(token).ok()?;
    String::from_utf8(bytes).ok()
}

/// Encode a string as standard base64. Counterpart of [`decode_base64`].
pub fn encode_base64(value: &str) -> String {
    Base64::encode_string(value.as_bytes())
}

/// Split decoded credentials on the first `:`.
///
/// Everything after the first colon, including further colons, belongs to
/// the password.
pub fn split_credentials(decoded: &str) -> Option<Credentials<'_>> {
    let (email, password) = decoded.split_once(':')?;
    Some(Credentials { email, password })
}
