use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Member — A member of Congress who files disclosures
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: String,
    pub name: String,
    pub party: String,
    pub state: String,
    pub chamber: String,
}

impl Member {
    /// Full party name for the single-letter party code.
    pub fn party_name(&self) -> &str {
        match self.party.as_str() {
            "D" => "Democrat",
            "R" => "Republican",
            "I" => "Independent",
            other => other,
        }
    }
}
