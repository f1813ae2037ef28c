// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Write operations.
//!
//! Single-row writes run directly on the connection. Functions that touch
//! several tables expect to be called inside a transaction opened by the
//! `Persistence` adapter.

pub mod applications;
pub mod audit;
pub mod branches;
pub mod decisions;
pub mod merit_lists;
pub mod seats;
pub mod sequences;
pub mod sessions;
pub mod students;
pub mod transitions;

pub use applications::{NewApplication, create_application};
pub use transitions::{PersistedTransition, persist_session_transition, persist_transition};
