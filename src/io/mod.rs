//! Input/output operations for region persistence
//!
//! This module provides the binary (de)serialization of regions and
//! region stacks used by the host application's persistence layer.

pub mod serializer;

pub use serializer::{
    read_boolean_mask, read_region, read_stack,
    write_boolean_mask, write_region, write_stack,
};
