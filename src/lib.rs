// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mindgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Mindgraph: diagram graph engine (graph store + undo/redo + generated-diagram import).
//!
//! The engine owns the node/edge graph behind an interactive canvas. All mutations go
//! through [`store::GraphStore`], which records a snapshot per committed change so the
//! session can be walked back and forth with undo/redo. Diagrams produced by an external
//! generation service are validated in full before they replace the live graph.

pub mod config;
pub mod error;
pub mod generate;
pub mod history;
pub mod import;
pub mod model;
pub mod ops;
pub mod selection;
pub mod store;
pub mod surface;

pub use config::EngineConfig;
pub use error::EngineError;
pub use store::GraphStore;
