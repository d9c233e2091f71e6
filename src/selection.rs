use crate::config::Registry;
use crate::error::{MapError, MapResult};
use crate::models::CandidateFilter;
use serde::{Deserialize, Serialize};

/// Which election is shown and which candidate(s) color the map.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SelectionState {
    pub election: String,
    pub candidate: CandidateFilter,
}

impl SelectionState {
    /// Start on the registry's first election with every winner shown.
    pub fn new(registry: &Registry) -> Self {
        Self {
            election: registry.default_election().id.clone(),
            candidate: CandidateFilter::All,
        }
    }

    /// Switch election. The candidate filter always falls back to "all",
    /// since the previous candidate may not run in the new election.
    pub fn set_election(&mut self, registry: &Registry, id: &str) -> MapResult<()> {
        registry.election(id)?;
        log::debug!("selection: election {} -> {}", self.election, id);
        self.election = id.to_string();
        self.candidate = CandidateFilter::All;
        Ok(())
    }

    /// Narrow the map to one candidate of the active election, or back to "all".
    pub fn set_candidate(&mut self, registry: &Registry, filter: CandidateFilter) -> MapResult<()> {
        if let CandidateFilter::Candidate(id) = &filter {
            let election = registry.election(&self.election)?;
            if !election.has_candidate(id) {
                return Err(MapError::UnknownCandidate {
                    election: self.election.clone(),
                    candidate: id.clone(),
                });
            }
        }
        log::debug!("selection: candidate {} -> {}", self.candidate, filter);
        self.candidate = filter;
        Ok(())
    }
}
