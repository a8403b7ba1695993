use serde::Serialize;

use super::Person;

/// Aggregate counts over the working set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Stats {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
}

impl Stats {
    pub fn compute(people: &[Person]) -> Self {
        let total = people.len();
        let completed = people.iter().filter(|p| p.is_completed).count();
        Self {
            total,
            completed,
            pending: total - completed,
        }
    }

    /// Completed share as a rounded percentage; 0 for an empty set.
    pub fn completion_percent(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        ((self.completed as f64 / self.total as f64) * 100.0).round() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn people(total: usize, completed: usize) -> Vec<Person> {
        (0..total)
            .map(|i| {
                let mut p = Person::new(Person::make_id(1, i), format!("n{}", i), "a".into(), None);
                p.is_completed = i < completed;
                p
            })
            .collect()
    }

    #[test]
    fn test_counts() {
        let stats = Stats::compute(&people(10, 3));
        assert_eq!(
            stats,
            Stats {
                total: 10,
                completed: 3,
                pending: 7
            }
        );
    }

    #[test]
    fn test_empty() {
        let stats = Stats::compute(&[]);
        assert_eq!(stats, Stats::default());
        assert_eq!(stats.completion_percent(), 0);
    }

    #[test]
    fn test_completion_percent_rounds() {
        assert_eq!(Stats::compute(&people(3, 1)).completion_percent(), 33);
        assert_eq!(Stats::compute(&people(3, 2)).completion_percent(), 67);
        assert_eq!(Stats::compute(&people(4, 4)).completion_percent(), 100);
    }
}
