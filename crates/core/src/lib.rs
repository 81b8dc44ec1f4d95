pub mod amount;
pub mod document;
pub mod geometry;
pub mod record;

pub use amount::Amount;
pub use document::{Document, Line, SIDE_SEPARATOR};
pub use geometry::{BBox, GeometryError, MaskRegion, Word, MIN_MASK_SIZE};
pub use record::{DocumentType, ExtractedRecord, FieldMap, NOT_DETECTED};
