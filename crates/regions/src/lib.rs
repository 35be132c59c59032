//! # hmhews-regions
//!
//! Administrative hierarchies and the identity layer between them.
//!
//! The boundary dataset (GADM-style: country / province / regency /
//! subdistrict) and the disaster database (DIBI) name the same places
//! differently. [`IdentityResolver`] builds an [`IdentityTable`] once per
//! run: every boundary region maps to at most one disaster-database region,
//! and anything that cannot be matched stays in the table as
//! [`Resolution::Unresolved`] so downstream counts can report it.
//!
//! ## Architecture
//!
//! ```text
//! Hierarchy (boundary) ─┐
//!                       ├─ IdentityResolver::resolve() ─> IdentityTable
//! Hierarchy (disaster) ─┤      1. manual override
//!                       │      2. exact name (parent-scoped)
//! OverrideTable ────────┘      3. normalized name (parent-scoped)
//! ```
//!
//! ## Quick Start
//!
//! ```
//! use hmhews_regions::{AdminLevel, AdminRegion, Hierarchy, IdentityResolver, MatchMethod};
//!
//! let gadm = Hierarchy::new("gadm", vec![
//!     AdminRegion::new("gadm", AdminLevel::Province, "IDN.9_1", "Jawa Barat", None),
//! ]).unwrap();
//! let dibi = Hierarchy::new("dibi", vec![
//!     AdminRegion::new("dibi", AdminLevel::Province, "32", "JAWA BARAT", None),
//! ]).unwrap();
//!
//! let table = IdentityResolver::default().resolve(&gadm, &dibi).unwrap();
//! let link = table.link("IDN.9_1").unwrap();
//! assert_eq!(link.target_id(), "32");
//! assert_eq!(link.method(), MatchMethod::NormalizedName);
//! ```

mod error;
mod hierarchy;
mod normalize;
mod overrides;
mod region;
mod resolver;
mod table;

pub use error::RegionError;
pub use hierarchy::Hierarchy;
pub use normalize::normalize_name;
pub use overrides::{OverrideEntry, OverrideTable};
pub use region::{AdminLevel, AdminRegion};
pub use resolver::IdentityResolver;
pub use table::{
    IdentityTable, MatchCounts, MatchMethod, RegionIdentityLink, Resolution, UnresolvedReason,
};
