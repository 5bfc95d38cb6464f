//! SDG interchange representation
//!
//! Produced by the external front end; the core only relies on node identity,
//! edge kinds and thread fork/join linkage surviving a round trip.

use crate::errors::Result;
use crate::features::concurrency::domain::ThreadSpec;
use crate::shared::models::{Edge, Node, Procedure};
use serde::{Deserialize, Serialize};

/// Serializable DTO for a dependence graph plus its thread registry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SdgDto {
    pub procedures: Vec<Procedure>,
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    #[serde(default)]
    pub threads: Vec<ThreadSpec>,
}

impl SdgDto {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
