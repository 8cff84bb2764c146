use std::path::PathBuf;

use smart_maze::{
    algo::tabular::{QTableAgent, QTableAgentConfig},
    config::MazeConfig,
    ds::TableSnapshot,
    env::DiscreteAction,
    gym::{GridWorld, MazeAction, Pos},
    train::{Control, FnHook, TrainingLoop},
    Error,
};

fn world(json: &str) -> GridWorld {
    GridWorld::from_config(MazeConfig::from_json(json).unwrap()).unwrap()
}

fn agent_for(world: &GridWorld, seed: u64) -> QTableAgent {
    QTableAgent::with_seed(
        world.num_states(),
        world.num_actions(),
        QTableAgentConfig::default(),
        seed,
    )
}

const REWARDS: &str = r#""rewards": { "goal": 10.0, "hazard": -5.0, "wall": -1.0, "step": -0.1 }"#;

#[test]
fn learns_trivial_maze() {
    let mut world = world(&format!(
        r#"{{ "width": 2, "height": 1, "start": [0, 0], "goal": [1, 0], {REWARDS} }}"#
    ));
    let mut agent = agent_for(&world, 7);

    let metrics = TrainingLoop::new(700, 50).run(&mut world, &mut agent, &mut ());
    assert_eq!(metrics.len(), 700, "every episode recorded");

    let start = world.state_index(world.start());
    let q = agent.q_values(start);
    let right = MazeAction::Right.index();
    for action in [MazeAction::Up, MazeAction::Down, MazeAction::Left] {
        assert!(
            q[right] > q[action.index()],
            "moving toward the goal beats {action:?}: {q:?}"
        );
    }
    assert!(
        agent.epsilon() <= 0.05 + 1e-12,
        "epsilon decayed to its floor"
    );
}

#[test]
fn unreachable_goal_hits_step_cap() {
    let mut world = world(&format!(
        r#"{{ "width": 3, "height": 1, "start": [0, 0], "goal": [2, 0], "walls": [[1, 0]], {REWARDS} }}"#
    ));
    let mut agent = agent_for(&world, 3);

    let metrics = TrainingLoop::new(5, 10).run(&mut world, &mut agent, &mut ());
    assert_eq!(metrics.len(), 5, "capped episodes are still recorded");
    assert_eq!(metrics.steps(), [10; 5]);
    assert_eq!(metrics.successes(), [0; 5]);
    for reward in metrics.rewards() {
        assert!((reward - -11.0).abs() < 1e-9, "every move is blocked: {reward}");
    }
    assert_eq!(world.position(), Pos::new(0, 0), "agent never left the start");
}

#[test]
fn stop_from_hook_truncates_run() {
    let mut world = world(&format!(
        r#"{{ "width": 4, "height": 4, "start": [0, 0], "goal": [3, 3], {REWARDS} }}"#
    ));
    let mut agent = agent_for(&world, 11);

    let mut hook = FnHook(|_: &GridWorld, info: &smart_maze::train::StepInfo<usize, MazeAction>| {
        if info.episode == 2 && info.step == 3 {
            Control::Stop
        } else {
            Control::Continue
        }
    });
    let metrics = TrainingLoop::new(100, 200).run(&mut world, &mut agent, &mut hook);

    assert!(metrics.is_cancelled());
    assert_eq!(metrics.len(), 3, "stopped in the third episode");
    assert_eq!(metrics.records()[2].steps, 3);
    assert_eq!(metrics.rewards().len(), metrics.steps().len());
    assert_eq!(metrics.steps().len(), metrics.successes().len());
}

#[test]
fn trains_bundled_maze() {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("demos/mazes/basic.json");
    let mut world = GridWorld::from_config(MazeConfig::from_path(path).unwrap()).unwrap();
    let mut agent = agent_for(&world, 2024);

    let metrics = TrainingLoop::new(600, 500).run(&mut world, &mut agent, &mut ());
    assert_eq!(metrics.len(), 600);
    assert!(metrics.success_rate() > 0.5, "{}", metrics.success_rate());

    agent.set_epsilon(0.0);
    let greedy = TrainingLoop::new(1, 1000)
        .with_log_every(0)
        .run(&mut world, &mut agent, &mut ());
    assert_eq!(greedy.successes(), [1], "greedy rollout reaches the goal");
    assert_eq!(world.position(), world.goal());
}

#[test]
fn snapshot_survives_disk() {
    let mut world = world(&format!(
        r#"{{ "width": 3, "height": 2, "start": [0, 0], "goal": [2, 1], {REWARDS} }}"#
    ));
    let mut agent = agent_for(&world, 5);
    TrainingLoop::new(50, 100).run(&mut world, &mut agent, &mut ());

    let path = std::env::temp_dir().join(format!("smart-maze-{}.json", std::process::id()));
    agent.snapshot().save(&path).unwrap();
    let loaded = TableSnapshot::load(&path).unwrap();
    let _ = std::fs::remove_file(&path);

    let mut fresh = agent_for(&world, 6);
    fresh.restore(&loaded).unwrap();
    assert_eq!(fresh.table(), agent.table(), "restored table matches");

    let mut wrong_shape = QTableAgent::with_seed(5, 4, QTableAgentConfig::default(), 0);
    let err = wrong_shape.restore(&loaded).unwrap_err();
    assert!(matches!(
        err,
        Error::ShapeMismatch {
            expected: [5, 4],
            found: [6, 4]
        }
    ));
}
