//! Painter remote-scripting integration
//!
//! Painter exposes an HTTP endpoint (when launched with
//! `--enable-remote-scripting`) that executes submitted Python source inside
//! the application and returns captured output as text. There is no
//! structured protocol on top of that: `script` builds the source, `remote`
//! posts it, `ops` decides success by scanning the response for the literal
//! markers our scripts print.

pub mod ops;
pub mod remote;
pub mod script;
