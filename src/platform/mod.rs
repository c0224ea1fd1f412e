//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Wall-clock time
//! - Device detection (touch/tilt controls)
//! - Storage (LocalStorage on web, in-memory on native)

use crate::error::GameError;

#[cfg(target_arch = "wasm32")]
fn local_storage() -> Result<web_sys::Storage, GameError> {
    web_sys::window()
        .and_then(|w| w.local_storage().ok())
        .flatten()
        .ok_or_else(|| GameError::Storage {
            message: "LocalStorage unavailable".to_string(),
        })
}

/// Read a string value, `Ok(None)` if the key is absent
#[cfg(target_arch = "wasm32")]
pub fn storage_get(key: &str) -> Result<Option<String>, GameError> {
    local_storage()?
        .get_item(key)
        .map_err(|e| GameError::Storage {
            message: format!("get_item({key}) failed: {e:?}"),
        })
}

#[cfg(target_arch = "wasm32")]
pub fn storage_set(key: &str, value: &str) -> Result<(), GameError> {
    local_storage()?
        .set_item(key, value)
        .map_err(|e| GameError::Storage {
            message: format!("set_item({key}) failed: {e:?}"),
        })
}

#[cfg(target_arch = "wasm32")]
pub fn storage_remove(key: &str) -> Result<(), GameError> {
    local_storage()?
        .remove_item(key)
        .map_err(|e| GameError::Storage {
            message: format!("remove_item({key}) failed: {e:?}"),
        })
}

/// Phones and tablets get tilt and on-screen buttons
#[cfg(target_arch = "wasm32")]
pub fn is_mobile() -> bool {
    let Some(window) = web_sys::window() else {
        return false;
    };
    let agent = window.navigator().user_agent().unwrap_or_default();
    user_agent_is_mobile(&agent)
}

// Native builds keep storage in a thread-local map so save/restore can be exercised headless.
#[cfg(not(target_arch = "wasm32"))]
thread_local! {
    static MEMORY_STORAGE: std::cell::RefCell<std::collections::HashMap<String, String>> =
        std::cell::RefCell::new(std::collections::HashMap::new());
}

#[cfg(not(target_arch = "wasm32"))]
pub fn storage_get(key: &str) -> Result<Option<String>, GameError> {
    Ok(MEMORY_STORAGE.with(|s| s.borrow().get(key).cloned()))
}

#[cfg(not(target_arch = "wasm32"))]
pub fn storage_set(key: &str, value: &str) -> Result<(), GameError> {
    MEMORY_STORAGE.with(|s| s.borrow_mut().insert(key.to_string(), value.to_string()));
    Ok(())
}

#[cfg(not(target_arch = "wasm32"))]
pub fn storage_remove(key: &str) -> Result<(), GameError> {
    MEMORY_STORAGE.with(|s| s.borrow_mut().remove(key));
    Ok(())
}

#[cfg(not(target_arch = "wasm32"))]
pub fn is_mobile() -> bool {
    false
}

/// Match the usual phone/tablet user agent markers
pub fn user_agent_is_mobile(agent: &str) -> bool {
    const MARKERS: [&str; 7] = [
        "Android",
        "webOS",
        "iPhone",
        "iPad",
        "iPod",
        "BlackBerry",
        "IEMobile",
    ];
    MARKERS.iter().any(|m| agent.contains(m)) || agent.contains("Opera Mini")
}
