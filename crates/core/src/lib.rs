// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared types for the workspace server: object identifiers, the object
//! reference primitive, the free-form meta map and its merge rule, the
//! closed `WaveObj` sum type, the otype tag, and a testable clock.

pub mod clock;
pub mod id;
pub mod macros;
pub mod meta;
pub mod objects;
pub mod oref;
pub mod otype;

pub use clock::{Clock, FakeClock, SystemClock};
pub use id::{InvalidOid, Oid, OID_HEX_LEN};
pub use meta::{merge_meta, Meta};
pub use objects::{
    Block, BlockRuntimeOpts, Client, Job, JobExitInfo, JobStatus, LayoutNode, LayoutState,
    MainServer, Tab, WaveObj, WaveObjError, WaveObjHeader, Window, WindowPos, WindowSize,
    Workspace,
};
pub use oref::{ORef, ORefParseError};
pub use otype::{Otype, UnknownOtype};
