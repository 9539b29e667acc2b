//! Parser modules for region files.
//!
//! # Usage
//!
//! ```ignore
//! use regions::parser::read_region_file;
//!
//! let regions = read_region_file(Path::new("sources.yaml"))?;
//!
//! for region in &regions {
//!     println!("{}: {}", region.name(), region.bounding_box());
//! }
//! ```

mod region_file;

pub use region_file::{
    parse_region_file, read_region_file, resolve_shape, write_region_file, RegionRecord,
};
