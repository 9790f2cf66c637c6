/// Keyword families mapping free-text credential phrases to a rank level.
/// Matching is case-insensitive substring containment; a phrase that
/// satisfies several families takes the highest level it matched.
const DOCTORAL: &[&str] = &["doctor", "phd", "ph.d", "d.phil"];
const MASTER: &[&str] = &["master", "mba", "m.b.a", "m.sc", "msc", "m.s."];
const BACHELOR: &[&str] = &["bachelor", "baccalaureate", "b.sc", "bsc", "b.s.", "b.a."];
const ASSOCIATE: &[&str] = &["associate", "diploma", "certificate"];

const TIERS: &[(&[&str], u8)] = &[(DOCTORAL, 4), (MASTER, 3), (BACHELOR, 2), (ASSOCIATE, 1)];

/// Rank a credential phrase. Unmatched text is level 0 and never selected.
pub(crate) fn credential_level(credential: &str) -> u8 {
    let normalized = credential.to_ascii_lowercase();
    for (phrases, level) in TIERS {
        if phrases.iter().any(|phrase| normalized.contains(phrase)) {
            return *level;
        }
    }
    0
}
