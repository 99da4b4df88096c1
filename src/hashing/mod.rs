//! Content fingerprints for duplicate detection.
//!
//! Text is normalized first (case folded, punctuation noise dropped, whitespace collapsed),
//! then hashed with BLAKE3. Two inputs that differ only in casing, spacing or punctuation
//! share a [`Fingerprint`]; anything else collides with negligible probability (256-bit digest).
//!
//! Near duplicates are caught separately: a question's [`TokenSignature`] is compared with
//! stored ones by Jaccard similarity of their token sets.


use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Deterministic 256-bit content fingerprint of normalized text.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Fingerprint([u8; 32]);

impl Fingerprint {
    /// Wraps raw digest bytes.
    #[inline]
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Parses a 64-character hex string.
    pub fn from_hex(hex: &str) -> Result<Self, blake3::HexError> {
        blake3::Hash::from_hex(hex).map(|hash| Self(*hash.as_bytes()))
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Lowercase hex encoding (64 characters).
    pub fn to_hex(&self) -> String {
        blake3::Hash::from(self.0).to_hex().to_string()
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hex = self.to_hex();
        write!(f, "Fingerprint({}..)", &hex[..12])
    }
}

impl Serialize for Fingerprint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Fingerprint {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let hex = String::deserialize(deserializer)?;
        Self::from_hex(&hex).map_err(serde::de::Error::custom)
    }
}

#[inline]
fn is_apostrophe(c: char) -> bool {
    matches!(c, '\'' | '\u{2018}' | '\u{2019}' | '`')
}

#[inline]
fn is_separator(c: char) -> bool {
    c.is_whitespace()
        || c.is_ascii_punctuation()
        || matches!(
            c,
            '\u{201C}' | '\u{201D}' | '\u{2013}' | '\u{2014}' | '\u{2026}' | '\u{00AB}' | '\u{00BB}'
                | '\u{00BF}' | '\u{00A1}' | '\u{00B7}' | '\u{2022}'
        )
}

/// Normalizes text for fingerprinting.
///
/// Lower-cases, deletes apostrophes (`vessel's` -> `vessels`), turns every other punctuation
/// mark into a word break and collapses runs of whitespace. Idempotent:
/// `normalize_text(normalize_text(s)) == normalize_text(s)`.
pub fn normalize_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_space = false;

    for c in text.chars().flat_map(char::to_lowercase) {
        if is_apostrophe(c) {
            continue;
        }
        if is_separator(c) {
            pending_space = !out.is_empty();
            continue;
        }
        if pending_space {
            out.push(' ');
            pending_space = false;
        }
        out.push(c);
    }

    out
}

/// Splits text into normalized tokens.
pub fn content_tokens(text: &str) -> Vec<String> {
    normalize_text(text)
        .split(' ')
        .filter(|t| !t.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Number of normalized tokens in `text`.
#[inline]
pub fn token_count(text: &str) -> usize {
    normalize_text(text).split(' ').filter(|t| !t.is_empty()).count()
}

/// Fingerprints `text` after [`normalize_text`].
///
/// Empty and whitespace-only input still yields a valid fingerprint (the hash of `""`).
#[inline]
pub fn fingerprint(text: &str) -> Fingerprint {
    Fingerprint(*blake3::hash(normalize_text(text).as_bytes()).as_bytes())
}

/// First 8 bytes of a BLAKE3 digest as a little-endian `u64`.
#[inline]
pub fn hash_to_u64(data: &[u8]) -> u64 {
    let hash = blake3::hash(data);
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&hash.as_bytes()[..8]);
    u64::from_le_bytes(bytes)
}

/// Distinct question tokens, each hashed with [`hash_to_u64`], sorted ascending.
///
/// The sorted order is the global token order used for prefix filtering: two signatures whose
/// Jaccard similarity reaches `t` always share a token within their [`prefix`](Self::prefix)
/// for `t`, so an index only has to post prefix tokens.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Vec<u64>", into = "Vec<u64>")]
pub struct TokenSignature(Vec<u64>);

/// Keeps float rounding from shortening a prefix (a shorter prefix could miss a match).
const PREFIX_SLACK: f64 = 1e-9;

impl TokenSignature {
    pub fn from_tokens<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        tokens
            .into_iter()
            .map(|t| hash_to_u64(t.as_ref().as_bytes()))
            .collect::<Vec<_>>()
            .into()
    }

    /// Signature of the normalized tokens of `text`.
    pub fn from_text(text: &str) -> Self {
        Self::from_tokens(content_tokens(text))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[inline]
    pub fn as_slice(&self) -> &[u64] {
        &self.0
    }

    /// Number of tokens both signatures contain.
    pub fn overlap(&self, other: &Self) -> usize {
        let (mut i, mut j, mut shared) = (0, 0, 0);
        while i < self.0.len() && j < other.0.len() {
            match self.0[i].cmp(&other.0[j]) {
                Ordering::Less => i += 1,
                Ordering::Greater => j += 1,
                Ordering::Equal => {
                    shared += 1;
                    i += 1;
                    j += 1;
                }
            }
        }
        shared
    }

    /// Jaccard similarity of the two token sets. `0.0` when either is empty.
    pub fn jaccard(&self, other: &Self) -> f64 {
        if self.is_empty() || other.is_empty() {
            return 0.0;
        }
        let shared = self.overlap(other);
        let union = self.len() + other.len() - shared;
        shared as f64 / union as f64
    }

    /// Leading tokens that any signature at least `threshold` similar must share one of.
    ///
    /// A match needs at least `ceil(threshold * len)` shared tokens, so it cannot miss all of
    /// the first `len - ceil(threshold * len) + 1`.
    pub fn prefix(&self, threshold: f64) -> &[u64] {
        let len = self.0.len();
        let required = ((threshold * len as f64 - PREFIX_SLACK).ceil().max(1.0) as usize).min(len);
        &self.0[..(len - required + 1).min(len)]
    }
}

impl From<Vec<u64>> for TokenSignature {
    fn from(mut hashes: Vec<u64>) -> Self {
        hashes.sort_unstable();
        hashes.dedup();
        Self(hashes)
    }
}

impl From<TokenSignature> for Vec<u64> {
    fn from(signature: TokenSignature) -> Self {
        signature.0
    }
}
