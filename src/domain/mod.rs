//! Catalog domain: records in, listing pages out.
pub mod aggregates;
pub mod events;
pub mod media;
pub mod query;
pub mod records;
pub mod synthesis;
pub mod url_state;
pub mod value_objects;
