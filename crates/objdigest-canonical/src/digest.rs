use md5::Md5;
use regex::Regex;
use serde::{Deserialize, Serialize};
use sha1::Sha1;
use sha2::{Digest as Sha2Digest, Sha256, Sha384, Sha512};
use std::fmt;
use std::io::{self, BufWriter, Read, Write};
use std::str::FromStr;

use crate::encoder::encode;
use crate::errors::{DigestError, DigestResult};
use crate::node::CanonicalNode;

/// Bytes moved into the hash state per update.
pub const CHUNK_SIZE: usize = 8 * 1024;

/// Supported digest algorithms.
///
/// Deserializes through [`FromStr`], so any accepted spelling works and an
/// unknown name reports [`DigestError::UnsupportedAlgorithm`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum DigestAlg {
    /// MD5, 128-bit. Legacy; kept for compatibility.
    #[serde(rename = "md5")]
    Md5,
    /// SHA-1, 160-bit. Legacy; kept for compatibility.
    #[serde(rename = "sha-1")]
    Sha1,
    /// SHA-256.
    #[default]
    #[serde(rename = "sha-256")]
    Sha256,
    /// SHA-384.
    #[serde(rename = "sha-384")]
    Sha384,
    /// SHA-512.
    #[serde(rename = "sha-512")]
    Sha512,
}

impl DigestAlg {
    /// Every supported algorithm, weakest first.
    pub const ALL: [DigestAlg; 5] = [
        DigestAlg::Md5,
        DigestAlg::Sha1,
        DigestAlg::Sha256,
        DigestAlg::Sha384,
        DigestAlg::Sha512,
    ];

    /// Canonical name, as used by serde.
    pub fn name(self) -> &'static str {
        match self {
            DigestAlg::Md5 => "md5",
            DigestAlg::Sha1 => "sha-1",
            DigestAlg::Sha256 => "sha-256",
            DigestAlg::Sha384 => "sha-384",
            DigestAlg::Sha512 => "sha-512",
        }
    }

    /// Native output width in bytes.
    pub fn output_len(self) -> usize {
        match self {
            DigestAlg::Md5 => 16,
            DigestAlg::Sha1 => 20,
            DigestAlg::Sha256 => 32,
            DigestAlg::Sha384 => 48,
            DigestAlg::Sha512 => 64,
        }
    }

    /// Length of the hex rendering.
    pub fn hex_len(self) -> usize {
        self.output_len() * 2
    }

    /// Whether this is one of the legacy 128/160-bit algorithms.
    pub fn is_legacy(self) -> bool {
        matches!(self, DigestAlg::Md5 | DigestAlg::Sha1)
    }
}

impl fmt::Display for DigestAlg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DigestAlg {
    type Err = DigestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .flat_map(char::to_lowercase)
            .collect();
        match normalized.as_str() {
            "md5" | "legacy128" => Ok(DigestAlg::Md5),
            "sha1" | "legacy160" => Ok(DigestAlg::Sha1),
            "sha256" => Ok(DigestAlg::Sha256),
            "sha384" => Ok(DigestAlg::Sha384),
            "sha512" => Ok(DigestAlg::Sha512),
            _ => Err(DigestError::UnsupportedAlgorithm(s.to_string())),
        }
    }
}

impl TryFrom<String> for DigestAlg {
    type Error = DigestError;

    fn try_from(name: String) -> Result<Self, Self::Error> {
        name.parse()
    }
}

enum HashState {
    Md5(Md5),
    Sha1(Sha1),
    Sha256(Sha256),
    Sha384(Sha384),
    Sha512(Sha512),
}

/// Incremental hash state that accepts bytes through [`Write`].
pub struct DigestComputer {
    alg: DigestAlg,
    state: HashState,
    bytes: u64,
}

impl DigestComputer {
    /// Fresh state for `alg`.
    pub fn new(alg: DigestAlg) -> Self {
        let state = match alg {
            DigestAlg::Md5 => HashState::Md5(Md5::new()),
            DigestAlg::Sha1 => HashState::Sha1(Sha1::new()),
            DigestAlg::Sha256 => HashState::Sha256(Sha256::new()),
            DigestAlg::Sha384 => HashState::Sha384(Sha384::new()),
            DigestAlg::Sha512 => HashState::Sha512(Sha512::new()),
        };
        Self {
            alg,
            state,
            bytes: 0,
        }
    }

    /// Algorithm in use.
    pub fn alg(&self) -> DigestAlg {
        self.alg
    }

    /// Bytes absorbed so far.
    pub fn bytes_hashed(&self) -> u64 {
        self.bytes
    }

    /// Absorbs `data`.
    pub fn update(&mut self, data: &[u8]) {
        self.bytes += data.len() as u64;
        match &mut self.state {
            HashState::Md5(h) => h.update(data),
            HashState::Sha1(h) => h.update(data),
            HashState::Sha256(h) => h.update(data),
            HashState::Sha384(h) => h.update(data),
            HashState::Sha512(h) => h.update(data),
        }
    }

    /// Consumes the state and returns the lowercase hex digest.
    pub fn finalize_hex(self) -> String {
        match self.state {
            HashState::Md5(h) => hex::encode(h.finalize()),
            HashState::Sha1(h) => hex::encode(h.finalize()),
            HashState::Sha256(h) => hex::encode(h.finalize()),
            HashState::Sha384(h) => hex::encode(h.finalize()),
            HashState::Sha512(h) => hex::encode(h.finalize()),
        }
    }
}

impl Write for DigestComputer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.update(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Hashes everything `reader` yields, `CHUNK_SIZE` bytes at a time.
pub fn digest_reader<R: Read>(mut reader: R, alg: DigestAlg) -> DigestResult<String> {
    let mut computer = DigestComputer::new(alg);
    let mut chunk = [0u8; CHUNK_SIZE];
    loop {
        let n = match reader.read(&mut chunk) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        };
        computer.update(&chunk[..n]);
    }
    Ok(computer.finalize_hex())
}

/// Encodes `node` straight into the hash state and returns the hex digest.
///
/// The encoder writes through a fixed `CHUNK_SIZE` buffer, so the encoded
/// form is never materialized in full.
pub fn digest_node(node: &CanonicalNode, alg: DigestAlg) -> DigestResult<String> {
    let mut sink = BufWriter::with_capacity(CHUNK_SIZE, DigestComputer::new(alg));
    encode(node, &mut sink)?;
    let computer = sink.into_inner().map_err(|e| e.into_error())?;
    Ok(computer.finalize_hex())
}

/// Algorithm + hex digest, validated against the algorithm's width.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HexDigest {
    /// Digest algorithm.
    pub alg: DigestAlg,
    /// Lowercase hex digest.
    pub hex: String,
}

impl HexDigest {
    /// Constructs a validated digest. Uppercase input is accepted and lowered.
    pub fn parse(alg: DigestAlg, hex: impl Into<String>) -> DigestResult<Self> {
        let hex = hex.into().to_ascii_lowercase();
        let re = Regex::new(&format!("^[0-9a-f]{{{}}}$", alg.hex_len())).expect("invalid regex");
        if !re.is_match(&hex) {
            return Err(DigestError::InvalidDigest { alg, value: hex });
        }
        Ok(HexDigest { alg, hex })
    }
}

impl fmt::Display for HexDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.hex)
    }
}
