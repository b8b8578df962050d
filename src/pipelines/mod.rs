// SPDX-License-Identifier: GPL-3.0-only

//! Processing pipelines
//!
//! Still capture runs off the control thread so the preview keeps flowing
//! while a photo is decoded, oriented and scaled.
//!
//! ```text
//! ┌──────────────┐     ┌───────────────────┐     ┌──────────────────┐
//! │ Still buffer │ ──▶ │  Capture worker   │ ──▶ │ Control thread   │
//! │  (backend)   │     │  - decode         │     │  completion(...) │
//! │              │     │  - orient/mirror  │     │                  │
//! │              │     │  - preview scale  │     │                  │
//! └──────────────┘     └───────────────────┘     └──────────────────┘
//! ```

pub mod photo;
