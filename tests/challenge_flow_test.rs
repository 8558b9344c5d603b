//! Daily challenge lifecycle through the app facade

mod common;

use std::collections::BTreeMap;

use rand::rngs::StdRng;
use rand::SeedableRng;

use common::{app_on, app_with, date, memory_repo};
use habitquest::challenges::{
    ActiveChallenge, ChallengeCatalog, ChallengeDefinition, ChallengeError, ChallengeStatus,
};
use habitquest::progression::{GamificationEvent, TraitKind, TraitProgress};
use habitquest::store::StoreKey;
use habitquest::Difficulty;

fn confidence_challenge() -> ChallengeDefinition {
    ChallengeDefinition {
        id: "hold-eye-contact".to_string(),
        title: "Hold eye contact in three conversations".to_string(),
        description: "Keep eye contact while the other person speaks".to_string(),
        category: TraitKind::Confidence,
        difficulty: Difficulty::Hard,
        estimated_minutes: 0,
        context: None,
        reflection_prompt: None,
        requires_reflection: false,
    }
}

#[test]
fn test_generate_twice_same_day_fails() {
    let repo = memory_repo();
    let app = app_on(&repo, date(2024, 4, 2));
    let mut rng = StdRng::seed_from_u64(7);

    let generated = app.generate_challenges(&mut rng).unwrap();
    assert_eq!(generated.len(), 3);
    assert!(matches!(
        app.generate_challenges(&mut rng),
        Err(ChallengeError::AlreadyGenerated)
    ));
    assert_eq!(app.challenges().today_challenges().len(), 3);

    // A new day starts fresh
    let tomorrow = app_on(&repo, date(2024, 4, 3));
    assert_eq!(tomorrow.generate_challenges(&mut rng).unwrap().len(), 3);
}

#[test]
fn test_third_skip_rejected() {
    let app = app_on(&memory_repo(), date(2024, 4, 2));
    let mut rng = StdRng::seed_from_u64(11);
    let ids: Vec<String> = app
        .generate_challenges(&mut rng)
        .unwrap()
        .into_iter()
        .map(|c| c.challenge.id)
        .collect();

    assert_eq!(app.challenges().skip(&ids[0]).unwrap(), 1);
    assert_eq!(app.challenges().skip(&ids[1]).unwrap(), 0);
    assert!(matches!(
        app.challenges().skip(&ids[2]),
        Err(ChallengeError::SkipLimitReached(2))
    ));
    assert!(app.challenges().today_challenges()[2].status.is_active());
}

#[test]
fn test_hard_confidence_crosses_trait_level() {
    let repo = memory_repo();
    let day = date(2024, 4, 2);
    let challenge = confidence_challenge();
    let app = app_with(&repo, day, ChallengeCatalog::new(vec![challenge.clone()]));

    let mut traits: BTreeMap<TraitKind, TraitProgress> = BTreeMap::new();
    traits.insert(
        TraitKind::Confidence,
        TraitProgress {
            level: 0,
            total_progress: 8,
        },
    );
    repo.save(StoreKey::Traits, &traits).unwrap();
    repo.save(
        StoreKey::ActiveChallenges,
        &vec![ActiveChallenge {
            challenge: challenge.clone(),
            date: day,
            start_time: 0,
            status: ChallengeStatus::Active,
        }],
    )
    .unwrap();

    let reward = app.complete_challenge(&challenge.id, None).unwrap();
    assert_eq!(reward.outcome.old_trait_level, 0);
    assert_eq!(reward.outcome.trait_level, 1);
    assert_eq!(reward.outcome.xp_reward, Difficulty::Hard.base_xp());

    let confidence = app.progression().traits()[&TraitKind::Confidence];
    assert_eq!(confidence.total_progress, 11);
    assert_eq!(confidence.level, 1);

    assert!(reward.events.iter().any(|e| matches!(
        e,
        GamificationEvent::TraitLevelUp { trait_kind: TraitKind::Confidence, new_level: 1 }
    )));
    assert!(reward
        .events
        .iter()
        .any(|e| matches!(e, GamificationEvent::StreakExtended { count: 1 })));
    assert!(app.progression().xp() >= u64::from(Difficulty::Hard.base_xp()));
}

#[test]
fn test_completed_challenge_cannot_be_failed() {
    let repo = memory_repo();
    let app = app_on(&repo, date(2024, 4, 2));
    let mut rng = StdRng::seed_from_u64(3);
    let id = app.generate_challenges(&mut rng).unwrap()[0]
        .challenge
        .id
        .clone();

    app.complete_challenge(&id, Some("Felt good".to_string()))
        .unwrap();
    assert!(matches!(
        app.challenges().fail(&id, None),
        Err(ChallengeError::NotActive { .. })
    ));

    let summary = app.challenges().daily_summary(None);
    assert_eq!(summary.total, 3);
    assert_eq!(summary.completed, 1);
    assert_eq!(summary.streak, 1);
}

#[test]
fn test_empty_pool_has_nothing_to_generate() {
    let app = app_with(
        &memory_repo(),
        date(2024, 4, 2),
        ChallengeCatalog::new(Vec::new()),
    );
    let mut rng = StdRng::seed_from_u64(1);
    assert!(matches!(
        app.generate_challenges(&mut rng),
        Err(ChallengeError::NoneAvailable)
    ));
}
