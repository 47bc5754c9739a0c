//! Host Controller Interface command encoding and the decoded event forms
//! consumed by [`crate::gap`] ([Vol 4] Part E).
//!
//! Transport framing and controller flow control are handled by the host.

pub use {addr::*, cmd::*, consts::*, event::*};

mod addr;
mod cmd;
mod consts;
mod event;

#[cfg(test)]
mod tests;
