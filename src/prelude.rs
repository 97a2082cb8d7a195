//! Brings the extension traits into scope: `use routetrie::prelude::*;`.

pub use crate::ext::RequestExt;
