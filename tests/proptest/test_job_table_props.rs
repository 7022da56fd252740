//! Property-based tests for job id assignment

#[path = "../test_utils/mod.rs"]
mod test_utils;

use nix::unistd::Pid;
use proptest::prelude::*;
use smash::JobTable;
use test_utils::{command, MockProcessOps};

proptest! {
    #[test]
    fn test_ids_strictly_increase(count in 1usize..30) {
        let mut jobs = JobTable::with_ops(MockProcessOps::shared());
        let ids: Vec<u32> = (0..count)
            .map(|n| jobs.add_job(command("sleep 1 &"), Pid::from_raw(1000 + n as i32), false))
            .collect();
        let expected: Vec<u32> = (1..=count as u32).collect();
        prop_assert_eq!(ids, expected);
    }

    #[test]
    fn test_next_id_follows_largest_survivor(
        count in 1usize..20,
        exits in prop::collection::vec(any::<bool>(), 20),
    ) {
        let ops = MockProcessOps::shared();
        let mut jobs = JobTable::with_ops(ops.clone());
        for n in 0..count {
            jobs.add_job(command("sleep 1 &"), Pid::from_raw(2000 + n as i32), false);
        }
        for n in 0..count {
            if exits[n] {
                ops.exit(2000 + n as i32);
            }
        }

        jobs.remove_finished_jobs();

        let largest = jobs.iter().map(|job| job.job_id).max().unwrap_or(0);
        prop_assert_eq!(jobs.next_job_id(), largest + 1);
        prop_assert_eq!(
            jobs.len(),
            exits[..count].iter().filter(|exited| !**exited).count()
        );
    }

    #[test]
    fn test_running_job_survives_reap(pid in 3000i32..4000) {
        let mut jobs = JobTable::with_ops(MockProcessOps::shared());
        let id = jobs.add_job(command("sleep 1 &"), Pid::from_raw(pid), false);
        jobs.remove_finished_jobs();
        prop_assert_eq!(jobs.get_job_by_id(id).map(|job| job.pid), Some(Pid::from_raw(pid)));
    }
}
