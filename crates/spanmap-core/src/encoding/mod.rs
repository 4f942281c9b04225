//! Compact layout encoding for the Spanright viewer.
//!
//! ```text
//! normalized PhysicalLayout + Monitor metadata
//!        │  record::build_record
//!        ▼
//!   LayoutRecord { v: 1, m: [MonitorRecord, ...] }
//!        │  serde_json (compact)
//!        ▼
//!   JSON text ── url::encode_payload ──► "~<lz-string token>"  (or raw JSON)
//!        │
//!        ▼
//!   {base_url}#layout={payload}
//! ```

/// Resolution alias table (`2560x1440` → `QHD`).
pub mod alias;

/// The versioned `{v, m}` record and its per-monitor entries.
pub mod record;

/// Payload compression and the `#layout=` URL fragment.
pub mod url;
