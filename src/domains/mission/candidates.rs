use super::ports::CandidatePoint;
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashSet;

/// Random choice that avoids names already handed out until every candidate has been used once.
#[derive(Debug, Default, Clone)]
pub struct RecentPicker {
    used: HashSet<String>,
}

impl RecentPicker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pick<'a, R: Rng + ?Sized>(
        &mut self,
        candidates: &'a [CandidatePoint],
        rng: &mut R,
    ) -> Option<&'a CandidatePoint> {
        if candidates.is_empty() {
            return None;
        }
        let mut fresh: Vec<&CandidatePoint> = candidates
            .iter()
            .filter(|c| !self.used.contains(&c.name))
            .collect();
        if fresh.is_empty() {
            self.used.clear();
            fresh = candidates.iter().collect();
        }
        let choice = *fresh.choose(rng)?;
        self.used.insert(choice.name.clone());
        Some(choice)
    }

    pub fn used_count(&self) -> usize {
        self.used.len()
    }
}
