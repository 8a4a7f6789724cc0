//! Identity handoff to the embedded collaboration SDK.
//!
//! SYSTEM CONTEXT
//! ==============
//! Presence, cursors, and comments are rendered by a third-party script
//! loaded into the page as `window.Velt`. The app initializes it once at the
//! root, then tells it who the current user is and which document the page
//! belongs to. Everything else is the SDK's concern.

#[cfg(test)]
#[path = "collab_test.rs"]
mod collab_test;

use serde::Serialize;

use crate::net::types::Identity;

pub const DEFAULT_ORGANIZATION_ID: &str = "default-org";
pub const ANONYMOUS_NAME: &str = "Anonymous User";
const TEXT_COLOR: &str = "#FFFFFF";

/// User record in the shape the SDK's `identify` expects.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollabUser {
    pub user_id: String,
    pub organization_id: String,
    pub name: String,
    pub email: String,
    pub photo_url: String,
    pub color: String,
    pub text_color: String,
}

impl CollabUser {
    #[must_use]
    pub fn from_identity(identity: &Identity) -> Self {
        Self {
            user_id: identity.id.clone(),
            organization_id: DEFAULT_ORGANIZATION_ID.to_owned(),
            name: display_name(identity),
            email: identity.email.clone(),
            photo_url: identity.avatar_url.clone().unwrap_or_default(),
            color: user_color(&identity.id),
            text_color: TEXT_COLOR.to_owned(),
        }
    }
}

/// Display name, else email local part, else [`ANONYMOUS_NAME`].
#[must_use]
pub fn display_name(identity: &Identity) -> String {
    if let Some(name) = identity.display_name.as_deref().map(str::trim).filter(|n| !n.is_empty()) {
        return name.to_owned();
    }
    let local = identity.email.split('@').next().unwrap_or_default().trim();
    if local.is_empty() { ANONYMOUS_NAME.to_owned() } else { local.to_owned() }
}

/// Stable avatar color for a user id, dark enough for white text.
#[must_use]
pub fn user_color(user_id: &str) -> String {
    // FNV-1a
    let mut hash: u32 = 0x811c_9dc5;
    for byte in user_id.bytes() {
        hash ^= u32::from(byte);
        hash = hash.wrapping_mul(0x0100_0193);
    }
    let [_, r, g, b] = hash.to_be_bytes();
    format!("#{:02X}{:02X}{:02X}", r & 0xBF, g & 0xBF, b & 0xBF)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CollabOutcome {
    Applied,
    /// The SDK is not on the page or has not been initialized.
    SdkMissing,
}

/// Script that defines `window.Velt`.
pub const SDK_URL: &str = "https://cdn.velt.dev/lib/sdk@latest/velt.js";

/// Shared document every collaborative page attaches to.
pub const DOCUMENT_ID: &str = "veltic-analytics";
pub const DASHBOARD_DOCUMENT: &str = "Dashboard";
pub const ANALYTICS_DOCUMENT: &str = "Analytics Dashboard";

/// Metadata passed alongside the document id.
#[must_use]
pub fn document_metadata(name: &str, last_updated: &str) -> serde_json::Value {
    serde_json::json!({ "documentName": name, "lastUpdated": last_updated })
}

#[cfg(feature = "hydrate")]
thread_local! {
    static CLIENT: std::cell::RefCell<Option<wasm_bindgen::JsValue>> = const { std::cell::RefCell::new(None) };
}

#[cfg(feature = "hydrate")]
fn js_err(e: wasm_bindgen::JsValue) -> String {
    format!("{e:?}")
}

/// Call `client.<method>(args..)` on the initialized SDK client.
#[cfg(feature = "hydrate")]
fn call_client(method: &str, args: &[wasm_bindgen::JsValue]) -> Result<CollabOutcome, String> {
    use wasm_bindgen::JsCast;

    let Some(client) = CLIENT.with(|c| c.borrow().clone()) else {
        return Ok(CollabOutcome::SdkMissing);
    };
    let function = js_sys::Reflect::get(&client, &method.into()).map_err(js_err)?;
    let function = function
        .dyn_ref::<js_sys::Function>()
        .ok_or_else(|| format!("collaboration client has no {method}()"))?;
    let args: js_sys::Array = args.iter().collect();
    function.apply(&client, &args).map_err(js_err)?;
    Ok(CollabOutcome::Applied)
}

#[cfg(feature = "hydrate")]
fn to_js(value: &impl Serialize) -> Result<wasm_bindgen::JsValue, String> {
    let json = serde_json::to_string(value).map_err(|e| e.to_string())?;
    js_sys::JSON::parse(&json).map_err(js_err)
}

/// Initialize the SDK with `api_key`. Later calls reuse the first client.
///
/// # Errors
///
/// Returns a description when the SDK is present but rejects the key.
pub async fn init(api_key: &str) -> Result<CollabOutcome, String> {
    if api_key.is_empty() {
        return Ok(CollabOutcome::SdkMissing);
    }
    #[cfg(feature = "hydrate")]
    {
        use wasm_bindgen::JsCast;

        if CLIENT.with(|c| c.borrow().is_some()) {
            return Ok(CollabOutcome::Applied);
        }
        let Some(window) = web_sys::window() else {
            return Ok(CollabOutcome::SdkMissing);
        };
        let sdk = js_sys::Reflect::get(&window, &"Velt".into()).map_err(js_err)?;
        if sdk.is_undefined() || sdk.is_null() {
            return Ok(CollabOutcome::SdkMissing);
        }
        let init = js_sys::Reflect::get(&sdk, &"init".into()).map_err(js_err)?;
        let Some(init) = init.dyn_ref::<js_sys::Function>() else {
            return Ok(CollabOutcome::SdkMissing);
        };
        let pending = init.call1(&sdk, &api_key.into()).map_err(js_err)?;
        let client = wasm_bindgen_futures::JsFuture::from(js_sys::Promise::resolve(&pending))
            .await
            .map_err(js_err)?;
        CLIENT.with(|c| c.replace(Some(client)));
        Ok(CollabOutcome::Applied)
    }
    #[cfg(not(feature = "hydrate"))]
    {
        Ok(CollabOutcome::SdkMissing)
    }
}

/// Hand `user` to the initialized SDK.
///
/// # Errors
///
/// Returns a description when the SDK rejects the call.
pub fn identify(user: &CollabUser) -> Result<CollabOutcome, String> {
    #[cfg(feature = "hydrate")]
    {
        call_client("identify", &[to_js(user)?])
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = user;
        Ok(CollabOutcome::SdkMissing)
    }
}

/// Attach presence and comments on the current page to `document_id`.
///
/// # Errors
///
/// Returns a description when the SDK rejects the call.
pub fn set_document(document_id: &str, name: &str) -> Result<CollabOutcome, String> {
    #[cfg(feature = "hydrate")]
    {
        let now = String::from(js_sys::Date::new_0().to_iso_string());
        call_client("setDocument", &[document_id.into(), to_js(&document_metadata(name, &now))?])
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (document_id, name);
        Ok(CollabOutcome::SdkMissing)
    }
}
