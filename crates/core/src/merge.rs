//! One-to-many join of appointments against the remarks lookup.

use crate::record::{LookupEntry, LookupMap, Record};

/// Output of [`merge`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeOutcome {
    /// One row per (appointment, lookup entry) pair, or the bare appointment.
    pub records: Vec<Record>,
    /// Appointments that matched at least one lookup entry.
    pub matched_appointments: usize,
}

/// Entries for an identifier: exact first, then with a literal `.0` appended
/// for lookup tables keyed by unnormalized numbers.
fn find_entries<'a>(lookup: &'a LookupMap, pat_id: &str) -> Option<&'a [LookupEntry]> {
    if pat_id.is_empty() {
        return None;
    }

    lookup
        .get(pat_id)
        .or_else(|| lookup.get(&format!("{pat_id}.0")))
        .map(Vec::as_slice)
        .filter(|entries| !entries.is_empty())
}

/// Join each appointment to its remarks.
///
/// A matched appointment expands into one copy per entry, in lookup order, with
/// `Remark` and `Agent Name` taken from the entry. An unmatched appointment is
/// kept once with both fields blanked. Appointment order is preserved.
pub fn merge(appointments: Vec<Record>, lookup: &LookupMap) -> MergeOutcome {
    let mut outcome = MergeOutcome {
        records: Vec::with_capacity(appointments.len()),
        matched_appointments: 0,
    };

    for mut appointment in appointments {
        let pat_id = appointment.pat_id().trim().to_string();

        match find_entries(lookup, &pat_id) {
            Some(entries) => {
                outcome.matched_appointments += 1;
                for entry in entries {
                    let mut row = appointment.clone();
                    row.set_remark(entry.remark.as_str());
                    row.set_agent_name(entry.agent_name.as_str());
                    outcome.records.push(row);
                }
            }
            None => {
                appointment.set_remark("");
                appointment.set_agent_name("");
                outcome.records.push(appointment);
            }
        }
    }

    tracing::debug!(
        rows = outcome.records.len(),
        matched = outcome.matched_appointments,
        "merged remarks into appointments"
    );
    outcome
}
