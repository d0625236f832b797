//! End-to-end path resolution through the public facade.

#[path = "../common/mod.rs"]
mod common;

mod collections;
mod cross_type;
mod cycles;
mod definitions;
mod end_to_end;
