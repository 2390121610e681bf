//! Key code translation for forwarding keystrokes into the remote session.
//!
//! The remote KVM page is a browser application, so the canonical
//! representation on the way out is the DOM `KeyboardEvent` pair:
//! `code` (the physical key, e.g. `"KeyE"`) and `key` (the produced value,
//! e.g. `"e"`).  Windows VK codes are translated at the capture boundary.

pub mod windows_vk;

use serde::Serialize;

use crate::domain::event::PhysicalKey;

/// The DOM `KeyboardEvent.code` / `KeyboardEvent.key` pair for one key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct DomKey {
    /// Layout-independent physical key identifier, e.g. `"MetaLeft"`.
    pub code: &'static str,
    /// Key value as the page sees it, e.g. `"Meta"` or `"e"`.
    pub key: &'static str,
}

/// Stateless key codec used on the capture hot path.
pub struct KeyEventCodec;

impl KeyEventCodec {
    /// Translates a physical key to the DOM code/key pair the remote expects.
    ///
    /// Returns `None` if the key has no mapping; such keys are never forwarded.
    pub fn translate(key: PhysicalKey) -> Option<DomKey> {
        windows_vk::vk_to_dom(key.vk())
    }

    /// Resolves a DOM code name (as written in the configuration file) back
    /// to the physical key that produces it.
    pub fn lookup_code(code: &str) -> Option<PhysicalKey> {
        windows_vk::dom_code_to_vk(code).map(PhysicalKey::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translate_returns_meta_for_left_windows_key() {
        let mapped = KeyEventCodec::translate(PhysicalKey::new(windows_vk::VK_LWIN));
        assert_eq!(mapped, Some(DomKey { code: "MetaLeft", key: "Meta" }));
    }

    #[test]
    fn test_translate_is_deterministic_for_every_vk() {
        for vk in 0..=u8::MAX {
            let key = PhysicalKey::new(vk);
            assert_eq!(KeyEventCodec::translate(key), KeyEventCodec::translate(key));
        }
    }

    #[test]
    fn test_lookup_code_round_trips_through_translate() {
        let key = KeyEventCodec::lookup_code("Backquote").expect("known code");
        assert_eq!(KeyEventCodec::translate(key).map(|d| d.key), Some("`"));
    }

    #[test]
    fn test_lookup_code_rejects_unknown_name() {
        assert_eq!(KeyEventCodec::lookup_code("Hyper"), None);
    }
}
