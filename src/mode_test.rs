use rand::SeedableRng;
use rand::rngs::StdRng;

use super::*;

#[test]
fn announcement_text_per_mode() {
    assert_eq!(Mode::Projectile.announcement(), "Click the moving ball!");
    assert_eq!(Mode::DropCatch.announcement(), "Catch the falling ball!");
}

#[test]
fn mode_serializes_snake_case() {
    assert_eq!(serde_json::to_string(&Mode::DropCatch).unwrap_or_default(), "\"drop_catch\"");
    assert_eq!(serde_json::to_string(&Mode::Projectile).unwrap_or_default(), "\"projectile\"");
}

#[test]
fn balanced_forces_lagging_drop_catch() {
    let mut policy = BalancedPolicy { projectile_count: 2, drop_catch_count: 1 };
    let mut rng = StdRng::seed_from_u64(0);
    assert_eq!(policy.choose(&mut rng), Mode::DropCatch);
    assert_eq!(policy.drop_catch_count, 2);
}

#[test]
fn balanced_forces_lagging_projectile() {
    let mut policy = BalancedPolicy { projectile_count: 0, drop_catch_count: 3 };
    let mut rng = StdRng::seed_from_u64(0);
    assert_eq!(policy.choose(&mut rng), Mode::Projectile);
    assert_eq!(policy.projectile_count, 1);
}

#[test]
fn balanced_alternates_after_tie_break() {
    let mut policy = BalancedPolicy::default();
    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..20 {
        let first = policy.choose(&mut rng);
        let second = policy.choose(&mut rng);
        assert_ne!(first, second);
        assert_eq!(policy.projectile_count, policy.drop_catch_count);
    }
}

#[test]
fn balanced_counts_never_drift_more_than_one() {
    let mut policy = BalancedPolicy::default();
    let mut rng = StdRng::seed_from_u64(9);
    for _ in 0..101 {
        policy.choose(&mut rng);
        assert!(policy.projectile_count.abs_diff(policy.drop_catch_count) <= 1);
    }
}

#[test]
fn random_policy_produces_both_modes() {
    let mut policy = RandomPolicy;
    let mut rng = StdRng::seed_from_u64(5);
    let picks: Vec<Mode> = (0..64).map(|_| policy.choose(&mut rng)).collect();
    assert!(picks.contains(&Mode::Projectile));
    assert!(picks.contains(&Mode::DropCatch));
}

#[test]
fn fixed_policy_ignores_rng() {
    let mut policy = FixedPolicy(Mode::DropCatch);
    let mut rng = StdRng::seed_from_u64(5);
    for _ in 0..4 {
        assert_eq!(policy.choose(&mut rng), Mode::DropCatch);
    }
}
