use std::collections::HashSet;

use serde::Serialize;

use crate::detail::encode_promoter_param;
use crate::visits::Visit;

/// Label shown for a promoter whose first visit carries no name.
pub const UNKNOWN_PROMOTER: &str = "Promotor Desconocido";

/// One promoter in the visit menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RosterEntry {
    pub email: String,
    pub name: String,
}

impl RosterEntry {
    /// Path of this promoter's detail view, with the email percent-encoded.
    #[must_use]
    pub fn detail_path(&self) -> String {
        format!("/promotor/{}", encode_promoter_param(&self.email))
    }
}

/// Folds the visit list into one entry per distinct promoter email.
///
/// Entries keep the order in which each email first appears. The name comes
/// from that first visit and is never updated by later ones. Visits without
/// an email are skipped.
#[must_use]
pub fn derive_roster(visits: &[Visit]) -> Vec<RosterEntry> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut roster = Vec::new();

    for visit in visits {
        let Some(email) = visit.promoter_email() else {
            continue;
        };
        if !seen.insert(email) {
            continue;
        }
        roster.push(RosterEntry {
            email: email.to_string(),
            name: visit
                .promoter_name()
                .unwrap_or(UNKNOWN_PROMOTER)
                .to_string(),
        });
    }

    roster
}
