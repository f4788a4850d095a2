// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mindgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use crate::config::ConfigError;
use crate::generate::GenerationError;
use crate::import::SchemaError;
use crate::model::GraphError;
use crate::ops::ApplyError;
use crate::surface::ExportError;

pub type Result<T> = std::result::Result<T, EngineError>;

/// Every failure the engine reports to its caller.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("invalid reference: node '{node_id}' does not exist")]
    InvalidReference { node_id: String },
    #[error("graph operation rejected: {0}")]
    Apply(ApplyError),
    #[error(transparent)]
    InvalidDiagramSchema(#[from] SchemaError),
    #[error("inconsistent graph: {0}")]
    Graph(#[from] GraphError),
    #[error(transparent)]
    GenerationService(#[from] GenerationError),
    #[error(transparent)]
    Export(#[from] ExportError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl From<ApplyError> for EngineError {
    fn from(err: ApplyError) -> Self {
        match err {
            ApplyError::InvalidReference { node_id } => Self::InvalidReference { node_id },
            other => Self::Apply(other),
        }
    }
}
