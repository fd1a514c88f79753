//! Multi-turn integration tests for the engine and both optimizers.
//!
//! These tests verify that long games stay well-formed, that the tree search
//! agrees with brute force on small rosters, and that the trainer actually
//! lowers the population's loss.
//!
//! Run with: cargo test --release game_integration

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use std::io::Write;

use rand::rngs::SmallRng;
use rand::SeedableRng;

use obelisk::game::check_invariants;
use obelisk::gp::{EvolutionConfig, FitnessConfig, Gene, Genome, SelectionConfig, Trainer};
use obelisk::policy::decide_all;
use obelisk::search::leaf_scores;
use obelisk::{combine_actions, search, step, update_clone, Action, PlayerState, Produce, RandomPolicy, SearchConfig};

fn reference_roster() -> Vec<PlayerState> {
    vec![
        PlayerState::new(2, 1, 2, 1),
        PlayerState::new(2, 1, 1, 2),
        PlayerState::new(2, 1, 2, 1),
        PlayerState::new(1, 2, 2, 1),
        PlayerState::new(1, 2, 2, 1),
    ]
}

#[test]
fn test_random_games_stay_well_formed() {
    let mut rng = SmallRng::seed_from_u64(42);
    let policies = [&RandomPolicy; 8];

    for _ in 0..50 {
        let mut players = vec![PlayerState::default(); 8];
        for turn in 0..100 {
            let actions = decide_all(&policies, &players, turn, &mut rng);
            step(&mut players, &actions).unwrap();
            assert!(check_invariants(&players).is_empty(), "turn {turn}: {players:?}");
        }
    }
}

#[test]
fn test_scripted_agents_play_forty_turns() {
    let mut rng = SmallRng::seed_from_u64(1);
    let builder = Genome::new(vec![Gene::O; 40]);
    let raider = Genome::new([Gene::S, Gene::S, Gene::A].repeat(14)[..40].to_vec());
    let turtle = Genome::new([Gene::W, Gene::D].repeat(20));
    let agents = [&builder, &raider, &turtle];

    let mut players = vec![PlayerState::default(); 3];
    for turn in 0..40 {
        let actions = decide_all(&agents, &players, turn, &mut rng);
        step(&mut players, &actions).unwrap();
    }

    assert!(check_invariants(&players).is_empty());
    // The raider only ever attacks players it outnumbers, so the builder
    // keeps most of its obelisks.
    assert!(players[0].obelisks > players[2].obelisks);
    assert!(players[2].walls <= 10);
}

#[test]
fn test_search_depth_zero_on_reference_roster() {
    let players = reference_roster();
    let result = search(&players, &SearchConfig::with_depth(0)).unwrap();
    assert_eq!(result.scores, leaf_scores(&players));
    assert!(result.plan.iter().all(Vec::is_empty));
}

#[test]
fn test_search_depth_one_on_reference_roster() {
    let players = reference_roster();
    let result = search(&players, &SearchConfig::with_depth(1)).unwrap();

    assert!(result.complete);
    assert_eq!(result.nodes, combine_actions(&players).len() as u64);
    assert!(result.plan.iter().all(|p| p.len() == 1));

    // No joint action beats the chosen one
    let best = result.total();
    for joint in combine_actions(&players) {
        let total: f64 = leaf_scores(&update_clone(&players, &joint).unwrap()).iter().sum();
        assert!(total <= best + 1e-9);
    }
}

#[test]
fn test_search_ties_resolve_to_last_joint_action() {
    // Without soldiers nobody can attack; every symmetric plan scores zero
    // and the last one enumerated (both defend, twice) is kept.
    let players = vec![PlayerState::new(1, 0, 1, 1), PlayerState::new(1, 0, 1, 1)];
    for parallel in [false, true] {
        let config = SearchConfig {
            depth: 2,
            parallel,
            deadline: None,
        };
        let result = search(&players, &config).unwrap();
        assert!(result.scores.iter().all(|s| s.abs() < 1e-9));
        assert_eq!(result.plan, vec![vec![Action::Defend; 2]; 2]);
    }
}

#[test]
fn test_trainer_lowers_mean_loss() {
    let config = EvolutionConfig {
        population_size: 60,
        genome_length: 40,
        generations: 15,
        seed: 11,
        report_interval: 5,
        top_agents: 5,
        fitness: FitnessConfig {
            sub_rounds: 10,
            group_size: 6,
            steps: 40,
            victory_obelisks: None,
        },
        selection: SelectionConfig {
            retain_population: 45,
            reproduce_population: 15,
            ..SelectionConfig::default()
        },
    };

    let mut trainer = Trainer::new(config).unwrap();
    let first = trainer.step_generation().unwrap();
    let mut last = first.clone();
    for _ in 1..config.generations {
        last = trainer.step_generation().unwrap();
    }

    // Loss falls as the whole population learns to raise obelisks.
    assert!(last.stats.mean < first.stats.mean, "{} vs {}", last.stats.mean, first.stats.mean);
    let best = &last.top[0].0;
    assert!(best.count(Gene::O) > best.count(Gene::N), "{best}");
}

#[test]
fn test_evolution_config_from_json_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{
            "population_size": 30,
            "generations": 2,
            "fitness": {{ "sub_rounds": 2, "victory_obelisks": 8 }},
            "selection": {{ "retain_population": 20, "reproduce_population": 10, "sexual_reproduction": false }}
        }}"#
    )
    .unwrap();

    let text = std::fs::read_to_string(file.path()).unwrap();
    let config: EvolutionConfig = serde_json::from_str(&text).unwrap();

    assert_eq!(config.population_size, 30);
    assert_eq!(config.fitness.group_size, 6);
    assert_eq!(config.fitness.victory_obelisks, Some(8));
    assert!(!config.selection.sexual_reproduction);
    assert!(config.validate().is_ok());

    let (population, stats) = obelisk::gp::evolve(config, |_| {}).unwrap();
    assert_eq!(population.len(), 30);
    assert_eq!(stats.generations.len(), 2);
}

#[test]
fn test_obelisk_action_counts_in_state() {
    let mut players = vec![PlayerState::default(); 2];
    for _ in 0..5 {
        step(&mut players, &[Action::Produce(Produce::Obelisk), Action::Idle]).unwrap();
    }
    assert_eq!(players[0].obelisks, 6);
    assert_eq!(players[1].soldiers, 6);
}
