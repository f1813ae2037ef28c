// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read-only queries. Every query filters by tenant.

pub mod applications;
pub mod audit;
pub mod branches;
pub mod decisions;
pub mod merit_lists;
pub mod seats;
pub mod sessions;
pub mod students;
