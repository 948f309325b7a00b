mod keyboard;
mod pointer;

pub(crate) use keyboard::{wire_playback_key, wire_viewer_keys};
pub(crate) use pointer::wire_pointer;
