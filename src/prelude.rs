//! This module simply brings the most common functionality under a single namespace, to prevent
//! excessive imports: the canonical [`Color`], the space ids, the format and option types that go
//! in and out of parsing and serialization, and the parse error. The free functions stay at the
//! crate root, so they're called as `chromaplus::parse` and so on.

pub use crate::color::{Color, Coord};
pub use crate::error::ColorParseError;
pub use crate::external::{ColorRecord, ExternalValue};
pub use crate::format::{AlphaMode, FormatDescriptor, NumericMode, ParseOptions, Precision};
pub use crate::illuminants::Illuminant;
pub use crate::space::ColorSpaceId;
