//! Utility helpers shared across client UI modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Utility modules isolate browser/environment concerns (storage, speech,
//! file picking) from page and component logic to improve reuse and
//! testability.

pub mod files;
pub mod ids;
pub mod speech;
pub mod storage;
pub mod timer;
