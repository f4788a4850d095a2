// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mindgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Prompt-to-diagram generation around the import validator.
//!
//! A generation is split into `begin` (takes a ticket, moves to `Generating`) and
//! `complete` (validates and imports the response). Nothing stops a second request while
//! one is in flight; each response is handled as it arrives, so by default the last one to
//! resolve wins. With `discard_stale_generations` a response older than the newest
//! applied one is dropped instead.

use std::collections::BTreeSet;
use std::time::Duration;

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::import::{import_into, ImportSummary};
use crate::store::GraphStore;
use crate::surface::RenderSurface;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum DiagramType {
    Flowchart,
    Mindmap,
    OrgChart,
    Process,
}

/// What is sent to the generation service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    pub prompt: String,
    pub diagram_type: DiagramType,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenerationError {
    #[error("prompt must not be empty")]
    EmptyPrompt,
    #[error("generation service unavailable: {0}")]
    Unavailable(String),
    #[error("generation service failed: {0}")]
    Service(String),
    #[error("generation timed out after {0:?}")]
    Timeout(Duration),
}

/// The external prompt-to-diagram service. The response is untrusted JSON.
#[async_trait]
pub trait DiagramGenerator: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> Result<Value, GenerationError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationState {
    Idle,
    Generating { in_flight: usize },
}

/// Handle for one in-flight generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationTicket {
    seq: u64,
    request: GenerationRequest,
}

impl GenerationTicket {
    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn request(&self) -> &GenerationRequest {
        &self.request
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationOutcome {
    Imported(ImportSummary),
    /// A newer response was already applied and stale responses are being dropped.
    DiscardedStale,
}

#[derive(Debug, Clone)]
pub struct GenerationController {
    next_seq: u64,
    in_flight: BTreeSet<u64>,
    last_applied: Option<u64>,
    clear_on_generate: bool,
    discard_stale: bool,
    timeout: Option<Duration>,
}

impl GenerationController {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            next_seq: 1,
            in_flight: BTreeSet::new(),
            last_applied: None,
            clear_on_generate: config.clear_on_generate,
            discard_stale: config.discard_stale_generations,
            timeout: config.generation_timeout_ms.map(Duration::from_millis),
        }
    }

    pub fn state(&self) -> GenerationState {
        if self.in_flight.is_empty() {
            GenerationState::Idle
        } else {
            GenerationState::Generating {
                in_flight: self.in_flight.len(),
            }
        }
    }

    /// Starts a generation. With `clear_on_generate` the canvas is emptied right away;
    /// otherwise the current diagram stays until a response imports successfully.
    pub fn begin(
        &mut self,
        store: &mut GraphStore,
        request: GenerationRequest,
    ) -> Result<GenerationTicket, GenerationError> {
        if request.prompt.trim().is_empty() {
            return Err(GenerationError::EmptyPrompt);
        }
        let seq = self.next_seq;
        self.next_seq += 1;
        if !self.in_flight.is_empty() {
            info!(
                seq,
                in_flight = self.in_flight.len(),
                "generation started while another is in flight"
            );
        }
        self.in_flight.insert(seq);
        if self.clear_on_generate {
            store.clear();
        }
        info!(seq, diagram_type = ?request.diagram_type, "generation started");
        Ok(GenerationTicket { seq, request })
    }

    /// Handles the response for `ticket`. The controller is back to `Idle` once the last
    /// in-flight ticket completes, whatever the outcome.
    pub fn complete(
        &mut self,
        ticket: GenerationTicket,
        response: Result<Value, GenerationError>,
        store: &mut GraphStore,
        surface: &mut dyn RenderSurface,
    ) -> Result<GenerationOutcome, EngineError> {
        self.in_flight.remove(&ticket.seq);

        let superseded = self.last_applied.is_some_and(|applied| applied > ticket.seq);
        if superseded && self.discard_stale {
            warn!(seq = ticket.seq, "discarding stale generation response");
            return Ok(GenerationOutcome::DiscardedStale);
        }

        let payload = response.map_err(|err| {
            warn!(seq = ticket.seq, "generation failed: {err}");
            err
        })?;
        let summary = import_into(store, surface, &payload)?;
        if superseded {
            warn!(seq = ticket.seq, "older generation response replaced a newer one");
        }
        let newest = self
            .last_applied
            .map_or(ticket.seq, |applied| applied.max(ticket.seq));
        self.last_applied = Some(newest);
        info!(
            seq = ticket.seq,
            nodes = summary.nodes,
            edges = summary.edges,
            "generation applied"
        );
        Ok(GenerationOutcome::Imported(summary))
    }

    /// Runs one request end to end against `generator`.
    pub async fn generate(
        &mut self,
        generator: &dyn DiagramGenerator,
        request: GenerationRequest,
        store: &mut GraphStore,
        surface: &mut dyn RenderSurface,
    ) -> Result<GenerationOutcome, EngineError> {
        let ticket = self.begin(store, request)?;
        let response = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, generator.generate(ticket.request()))
                .await
                .unwrap_or(Err(GenerationError::Timeout(limit))),
            None => generator.generate(ticket.request()).await,
        };
        self.complete(ticket, response, store, surface)
    }
}
