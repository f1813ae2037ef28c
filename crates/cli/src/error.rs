// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use admissions_api::ApiError;
use admissions_persistence::PersistenceError;

/// Errors surfaced by the operator binary.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("failed to open the store: {0}")]
    Store(#[from] PersistenceError),
    #[error("failed to render output: {0}")]
    Output(#[from] serde_json::Error),
}
