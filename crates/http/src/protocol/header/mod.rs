//! Header related types.
//!
//! This module has three main types:
//!  * [`HeaderBlock`] is the ordered list of fields of one message,
//!  * [`HeaderField`] is a single `name: value` pair, and finally
//!  * [`HeaderKey`] is the case-insensitive name of a field.
//!
//! A registry of well-known names is available as constants on [`HeaderKey`].

mod block;
mod field;
mod key;

pub use block::HeaderBlock;
pub use field::HeaderField;
pub use key::HeaderKey;

pub(crate) use field::is_continuation;
