//! # Armorcheck - Verify hand-transcribed armored ciphertext
//!
//! Armorcheck lets two people move an ASCII-armored message (PGP style)
//! over paper: the sender prints the armor with a short checksum per line
//! segment, the receiver retypes or OCRs it and finds exactly which
//! segments came back wrong.
//!
//! ## Overview
//!
//! - Armor is **normalized** to a canonical, fixed-width layout
//! - Every core line is cut into `parts` **segments**, each with a short
//!   base-32 **checksum** taken from its SHA-256 digest
//! - Checksums travel as a compact **payload** (`SC4:...`) suited to a QR
//!   code, or as a hand-typed `[index] CODE` listing
//! - The receiver **verifies** retyped text against the expected list and
//!   gets **highlight runs** pointing at broken blocks and at characters
//!   that are easy to misread
//!
//! Nothing here encrypts or decrypts. Once every block matches, the
//! canonical text is handed to an external OpenPGP tool.
//!
//! ## Example Usage
//!
//! ```rust
//! use armorcheck::checksum::{ChecksumEngine, ChecksumProfile};
//! use armorcheck::payload::encode_payload;
//! use armorcheck::verify::Verification;
//! use armorcheck::{normalize_armored, ARMOR_WRAP_COLUMNS};
//!
//! let armor = "-----BEGIN PGP MESSAGE-----\n\nhQEMA5x7Yz1\n-----END PGP MESSAGE-----";
//!
//! // Sender: canonical text, checksums and the payload to print
//! let engine = ChecksumEngine::new(ChecksumProfile::default()).unwrap();
//! let canonical = normalize_armored(armor, ARMOR_WRAP_COLUMNS);
//! let blocks = engine.compute(&canonical).unwrap();
//! let payload = encode_payload(&blocks).unwrap().unwrap();
//!
//! // Receiver: retyped text checked against the scanned payload
//! let check = Verification::run(armor, &payload, &engine, ARMOR_WRAP_COLUMNS).unwrap();
//! assert!(check.summary.is_match());
//! ```
//!
//! ## Modules
//!
//! - [`armor`]: BEGIN/END detection, normalization and pagination
//! - [`checksum`]: segment partitioning and block checksums
//! - [`payload`]: versioned `SC4`/`SC2` payload codec
//! - [`expected`]: manual checksum entry and payload dispatch
//! - [`verify`]: mismatch detection and user summary
//! - [`highlight`]: correction runs and ambiguous characters
//! - [`config`]: user preferences over a key/value store
//! - [`gpg`]: decrypt command for verified text

/// Body line width of canonical armor (RFC 4880 uses 64-76).
pub const ARMOR_WRAP_COLUMNS: usize = 65;

/// Armor lines printed per postcard page.
pub const POSTCARD_LINES_PER_PAGE: usize = 40;

/// Checksum listing entries printed per postcard page.
pub const CHECKSUM_BLOCKS_PER_PAGE: usize = 30;

pub mod armor;
pub mod checksum;
pub mod config;
pub mod expected;
pub mod gpg;
pub mod highlight;
pub mod payload;
pub mod verify;

pub use armor::{normalize_armored, split_by_lines};
pub use checksum::{compute_checksums, ChecksumBlock, ChecksumEngine, ChecksumError, ChecksumProfile};
pub use config::{KeyValueStore, MemoryStore, Preferences, StoreError, TomlFileStore};
pub use expected::{parse_manual, read_expected, ExpectedChecksum};
pub use gpg::gpg_decrypt_command;
pub use highlight::{highlight, AmbiguousChars, CharClass, HighlightRun, RunStatus};
pub use payload::{decode_payload, encode_payload, Payload, PayloadError, PayloadVersion};
pub use verify::{verify, MismatchReport, Summary, Verification};
