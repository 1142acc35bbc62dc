use crate::core::{areas::normalized_areas, scoring::score_against};
use crate::models::{MatchOptions, MenteeProfile, MentorProfile, ScoredMentor, ScoringWeights};

/// Result of the matching process
#[derive(Debug)]
pub struct MatchResult {
    pub matches: Vec<ScoredMentor>,
    pub total_candidates: usize,
}

/// Mentor ranking
///
/// Scores every candidate independently against the mentee and orders them
/// best-first. Ranking is a pure function of its inputs: nothing is fetched,
/// nothing is mutated, and the output holds exactly the input candidates.
#[derive(Debug, Clone, Default)]
pub struct Matcher {
    weights: ScoringWeights,
    options: MatchOptions,
}

impl Matcher {
    pub fn new(weights: ScoringWeights, options: MatchOptions) -> Self {
        Self { weights, options }
    }

    pub fn with_default_weights() -> Self {
        Self::default()
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    pub fn options(&self) -> &MatchOptions {
        &self.options
    }

    /// Rank mentors for a mentee
    ///
    /// # Arguments
    /// * `mentee` - The requester whose interest areas drive the overlap signal
    /// * `candidates` - Mentors to rank; may be empty
    ///
    /// # Returns
    /// One `ScoredMentor` per candidate, sorted by `match_score` descending.
    /// The sort is stable and keyed on the score alone, so mentors with equal
    /// scores keep their input order.
    pub fn rank_matches(
        &self,
        mentee: &MenteeProfile,
        candidates: &[MentorProfile],
    ) -> Vec<ScoredMentor> {
        let interests = normalized_areas(&mentee.interest_areas, self.options.dedupe_areas);

        let mut scored: Vec<ScoredMentor> = candidates
            .iter()
            .map(|mentor| {
                let breakdown = score_against(&interests, mentor, &self.weights, &self.options);
                tracing::trace!(
                    "Scored mentor {}: overlap={} rating={} experience={}",
                    mentor.id,
                    breakdown.overlap,
                    breakdown.rating,
                    breakdown.experience
                );

                ScoredMentor {
                    mentor: mentor.clone(),
                    match_score: breakdown.total(),
                }
            })
            .collect();

        // slice::sort_by is stable
        scored.sort_by(|a, b| b.match_score.total_cmp(&a.match_score));

        scored
    }

    /// Rank and keep at most `limit` mentors
    ///
    /// `total_candidates` reports how many mentors were ranked before the cut.
    pub fn find_matches(
        &self,
        mentee: &MenteeProfile,
        candidates: &[MentorProfile],
        limit: Option<usize>,
    ) -> MatchResult {
        let total_candidates = candidates.len();
        let mut matches = self.rank_matches(mentee, candidates);

        if let Some(limit) = limit {
            matches.truncate(limit);
        }

        MatchResult {
            matches,
            total_candidates,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_mentor(id: &str, expertise: &[&str], rating: f64, sessions: u32) -> MentorProfile {
        MentorProfile::new(id, expertise.iter().map(|s| s.to_string()).collect())
            .with_rating(rating)
            .with_completed_sessions(sessions)
    }

    fn ids(matches: &[ScoredMentor]) -> Vec<&str> {
        matches.iter().map(|m| m.mentor.id.as_str()).collect()
    }

    #[test]
    fn test_rank_matches_reference_scenario() {
        let matcher = Matcher::with_default_weights();
        let mentee = MenteeProfile::new("u1", vec!["React".into(), "javascript".into()]);

        let candidates = vec![
            create_mentor("m1", &["React", "Node.js"], 4.0, 20),
            create_mentor("m2", &["JavaScript"], 4.8, 3),
            create_mentor("m3", &["Algorithms"], 5.0, 100),
        ];

        let ranked = matcher.rank_matches(&mentee, &candidates);

        assert_eq!(ids(&ranked), vec!["m1", "m2", "m3"]);
        assert!((ranked[0].match_score - 8.0).abs() < 1e-9);
        assert!((ranked[1].match_score - 7.4).abs() < 1e-9);
        assert!((ranked[2].match_score - 7.0).abs() < 1e-9);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let matcher = Matcher::with_default_weights();
        let mentee = MenteeProfile::new("u1", vec![]);

        let candidates = vec![
            create_mentor("a", &[], 3.0, 0),
            create_mentor("b", &[], 4.0, 0),
            create_mentor("c", &[], 3.0, 0),
            create_mentor("d", &[], 3.0, 0),
        ];

        let ranked = matcher.rank_matches(&mentee, &candidates);

        assert_eq!(ids(&ranked), vec!["b", "a", "c", "d"]);
    }

    #[test]
    fn test_inputs_untouched() {
        let matcher = Matcher::with_default_weights();
        let mentee = MenteeProfile::new("u1", vec!["Rust".into()]);
        let candidates = vec![
            create_mentor("m1", &["Go"], 1.0, 1),
            create_mentor("m2", &["rust"], 1.0, 1),
        ];
        let before = candidates.clone();

        let ranked = matcher.rank_matches(&mentee, &candidates);

        assert_eq!(candidates, before);
        assert_eq!(ranked[0].mentor, before[1]);
        assert_eq!(ranked[1].mentor, before[0]);
    }

    #[test]
    fn test_find_matches_respects_limit() {
        let matcher = Matcher::with_default_weights();
        let mentee = MenteeProfile::new("u1", vec!["rust".into()]);

        let candidates: Vec<MentorProfile> = (0..20)
            .map(|i| create_mentor(&i.to_string(), &["rust"], (i % 5) as f64, i))
            .collect();

        let limited = matcher.find_matches(&mentee, &candidates, Some(5));
        assert_eq!(limited.matches.len(), 5);
        assert_eq!(limited.total_candidates, 20);

        let all = matcher.find_matches(&mentee, &candidates, None);
        assert_eq!(all.matches.len(), 20);
        assert_eq!(&all.matches[..5], &limited.matches[..]);
    }

    #[test]
    fn test_dedupe_option_changes_ranking() {
        let mentee = MenteeProfile::new("u1", vec!["rust".into()]);
        let candidates = vec![
            create_mentor("tagger", &["Rust", "rust", "RUST"], 3.0, 0),
            create_mentor("rated", &["rust"], 5.0, 0),
        ];

        let raw = Matcher::with_default_weights().rank_matches(&mentee, &candidates);
        assert_eq!(ids(&raw), vec!["tagger", "rated"]);

        let deduped = Matcher::new(ScoringWeights::default(), MatchOptions { dedupe_areas: true })
            .rank_matches(&mentee, &candidates);
        assert_eq!(ids(&deduped), vec!["rated", "tagger"]);
    }
}
