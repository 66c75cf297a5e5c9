use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

/// The share of a run one worker plays, with its own generator seed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerPlan {
    pub index: usize,
    pub rounds: u64,
    pub seed: u64,
}

/// Splits `rounds` across `workers` as evenly as possible; the first workers
/// absorb the remainder. Worker seeds are drawn in order from `run_seed`, so a
/// given seed and worker count always produce the same plans.
pub fn plan_workers(rounds: u64, workers: usize, run_seed: u64) -> Vec<WorkerPlan> {
    let workers = workers.max(1);
    let mut rng = StdRng::seed_from_u64(run_seed);
    let share = rounds / workers as u64;
    let remainder = rounds % workers as u64;

    (0..workers)
        .map(|index| WorkerPlan {
            index,
            rounds: share + u64::from((index as u64) < remainder),
            seed: rng.next_u64(),
        })
        .filter(|plan| plan.rounds > 0)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::plan_workers;

    #[test]
    fn splits_rounds_with_remainder_first() {
        let plans = plan_workers(10, 3, 7);
        let rounds: Vec<u64> = plans.iter().map(|p| p.rounds).collect();
        assert_eq!(rounds, vec![4, 3, 3]);
        assert_eq!(rounds.iter().sum::<u64>(), 10);
    }

    #[test]
    fn idle_workers_are_dropped() {
        let plans = plan_workers(2, 8, 7);
        assert_eq!(plans.len(), 2);
        assert!(plan_workers(5, 0, 1).len() == 1);
    }

    #[test]
    fn seeds_are_deterministic_and_distinct() {
        let a = plan_workers(100, 4, 99);
        let b = plan_workers(100, 4, 99);
        assert_eq!(a, b);
        assert_ne!(a[0].seed, a[1].seed);
        assert_ne!(plan_workers(100, 4, 100)[0].seed, a[0].seed);
    }
}
