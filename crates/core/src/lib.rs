// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! vimap-core: identifiers, rigid transforms, clock abstraction, and the
//! error taxonomy shared by every crate in the mapping server.

pub mod macros;

pub mod clock;
pub mod error;
pub mod ident;
pub mod transform;

pub use clock::{Clock, FakeClock, SystemClock};
pub use error::{ErrorKind, MapError, MapResult};
pub use ident::{MapHash, MapKey, MissionId, RobotId, SensorId};
pub use transform::{Quat, Transform, Vec3};
