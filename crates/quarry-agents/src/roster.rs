//! [`Roster`] – a named, ordered collection of agents.
//!
//! Bookkeeping only: construction order is preserved, membership is
//! append-only, and cross-roster relationships go through frame names
//! resolved with [`Roster::find`] rather than shared handles.

use std::fmt;
use std::sync::Arc;

use quarry_registry::PoseStore;
use tracing::warn;

use crate::agent::Agent;
use quarry_types::TeamColor;

/// An ordered team roster.
pub struct Roster {
    label: String,
    team: Option<TeamColor>,
    members: Vec<Agent>,
}

impl Roster {
    /// Build a roster from a team label and frame names, creating one agent
    /// per name and assigning the team to each.
    ///
    /// An unrecognised label is diagnosed (not an error): the roster keeps
    /// the label text for display and its members simply stay teamless.
    pub fn new<I, S>(label: impl Into<String>, frames: I, store: Arc<dyn PoseStore>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let label = label.into();
        let team = match label.parse::<TeamColor>() {
            Ok(color) => Some(color),
            Err(err) => {
                warn!(label = %label, error = %err, "unrecognised team label; members stay teamless");
                None
            }
        };

        let mut roster = Self {
            label,
            team,
            members: Vec::new(),
        };
        for frame in frames {
            let mut agent = Agent::new(frame, Arc::clone(&store));
            if let Some(color) = team {
                // Label already validated above, so this cannot fail.
                let _ = agent.set_team(color.as_str());
            }
            roster.members.push(agent);
        }
        roster
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn team(&self) -> Option<TeamColor> {
        self.team
    }

    /// Members in construction order.
    pub fn members(&self) -> &[Agent] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Append a member.  Membership never shrinks.
    pub fn enroll(&mut self, agent: Agent) {
        self.members.push(agent);
    }

    /// Look up a member by frame name (first match in construction order).
    pub fn find(&self, frame: &str) -> Option<&Agent> {
        self.members.iter().find(|agent| agent.frame() == frame)
    }
}

impl fmt::Display for Roster {
    /// Deterministic ordered dump of the roster.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Team {} has the following players:", self.label)?;
        for agent in &self.members {
            writeln!(f, "  {}", agent.frame())?;
        }
        Ok(())
    }
}
