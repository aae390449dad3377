use space_invaders::entities::GameStatus;
use space_invaders::state::*;

#[test]
fn starts_at_the_intro() {
    let mut machine = StateMachine::new();
    assert_eq!(machine.status(), GameStatus::Intro);
    assert_eq!(machine.route(), None);
    assert_eq!(machine.enter(), Some(GameStatus::Intro));
    assert_eq!(machine.route(), Some(GameStatus::Intro));
}

#[test]
fn entry_runs_once() {
    let mut machine = StateMachine::new();
    machine.enter();
    for _ in 0..10 {
        assert_eq!(machine.enter(), None);
    }
    assert_eq!(machine.entries(), 1);
}

#[test]
fn transition_drops_the_old_route() {
    let mut machine = StateMachine::new();
    machine.enter();
    machine.set_status(GameStatus::Game);
    assert_eq!(machine.status(), GameStatus::Game);
    assert_eq!(machine.route(), None);

    assert_eq!(machine.enter(), Some(GameStatus::Game));
    assert_eq!(machine.route(), Some(GameStatus::Game));
    assert_eq!(machine.entries(), 2);
}

#[test]
fn reentering_the_same_mode_runs_its_entry_again() {
    let mut machine = StateMachine::new();
    machine.enter();
    machine.set_status(GameStatus::Intro);
    assert_eq!(machine.enter(), Some(GameStatus::Intro));
}

#[test]
fn status_names() {
    assert_eq!(GameStatus::Intro.to_string(), "intro");
    assert_eq!(GameStatus::Game.to_string(), "game");
    assert_eq!(GameStatus::GameOver.to_string(), "gameOver");
    assert_eq!(GameStatus::HighScore.to_string(), "highScore");
}
