//! JSON-RPC 2.0 bridge between the viewport and the page that embeds it.
//!
//! Messages travel over `postMessage`. Requests carrying an `id` get a
//! response with the same `id`; requests without one are handled silently.
//! Notifications flow one way, from the viewport to the page.
//!
//! ```text
//! Host page                                 Viewport (iframe)
//!     ├─ request {method, id} ──────────────────> │
//!     │ <──────────────────── response {id} ──────┤
//!     │ <──────────────── notification {method} ──┤
//! ```
//!
//! ## Methods
//!
//! - `mount_viewport`: queue a mount; answers `{"accepted": true}` at once
//! - `unmount_viewport`: queue teardown of the current mount
//! - `get_viewport_status`: phase, mount epoch, status line, load progress
//!   and assembled character count
//! - `get_fps`: smoothed frame rate
//!
//! Any other method answers with error `-32601`.
//!
//! ## Notifications
//!
//! - `viewport_mounted` / `viewport_unmounted`: `{epoch}`
//! - `characters_ready`: `{epoch, count}`
//! - `viewport_error`: `{kind, fatal, message}`
//! - `fps_update`: `{fps}` every half second

pub mod web_rpc;
