//! Match host driven through its handle, the way the bridge drives it

use std::time::Duration;

use fighter_engine::game::{Controls, GameMatch, MatchCommand, MatchSnapshot, PlayerId, RoundPhase};
use fighter_engine::ws::protocol::ServerMsg;
use tokio::sync::broadcast;
use tokio::time::timeout;
use tokio_test::assert_ok;
use uuid::Uuid;

const WAIT: Duration = Duration::from_secs(5);

async fn next_snapshot(
    rx: &mut broadcast::Receiver<ServerMsg>,
    mut pred: impl FnMut(&MatchSnapshot) -> bool,
) -> MatchSnapshot {
    timeout(WAIT, async {
        loop {
            match rx.recv().await {
                Ok(ServerMsg::Snapshot(snapshot)) if pred(&snapshot) => return snapshot,
                Ok(_) | Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(broadcast::error::RecvError::Closed) => panic!("host stopped"),
            }
        }
    })
    .await
    .expect("timed out waiting for snapshot")
}

#[tokio::test]
async fn host_does_not_simulate_until_started() {
    let (host, handle) = GameMatch::new(240, false);
    let mut rx = handle.subscribe();
    tokio::spawn(host.run());

    let conn = Uuid::new_v4();
    let mut controls = Controls::default();
    controls.right = true;
    handle
        .send(
            conn,
            MatchCommand::Controls {
                player: PlayerId::Player1,
                controls,
            },
        )
        .await
        .unwrap();

    let idle = next_snapshot(&mut rx, |_| true).await;
    assert_eq!(idle.phase, RoundPhase::NotStarted);
    assert_eq!(idle.tick, 0);
    assert_eq!(idle.player1.x, 150.0);

    assert_ok!(handle.send(conn, MatchCommand::Start).await);

    let moved = next_snapshot(&mut rx, |s| s.player1.x > 150.0).await;
    assert_eq!(moved.phase, RoundPhase::Running);
    assert!(moved.tick > 0);
    assert_eq!(handle.latest_snapshot().match_id, handle.id);
}

#[tokio::test]
async fn disconnect_releases_held_keys() {
    let (host, handle) = GameMatch::new(240, true);
    let mut rx = handle.subscribe();
    tokio::spawn(host.run());

    let conn = Uuid::new_v4();
    let mut controls = Controls::default();
    controls.left = true;
    handle
        .send(
            conn,
            MatchCommand::Controls {
                player: PlayerId::Player2,
                controls,
            },
        )
        .await
        .unwrap();
    next_snapshot(&mut rx, |s| s.player2.x < 600.0).await;

    assert_ok!(handle.send(conn, MatchCommand::Disconnect).await);

    // Friction brings the fighter to rest once the key is released
    let rest = next_snapshot(&mut rx, |s| s.player2.vel_x == 0.0 && s.tick > 60).await;
    let later = next_snapshot(&mut rx, |s| s.tick > rest.tick + 10).await;
    assert_eq!(rest.player2.x, later.player2.x);
}

#[tokio::test]
async fn reset_announces_new_round() {
    let (host, handle) = GameMatch::new(240, true);
    let mut rx = handle.subscribe();
    tokio::spawn(host.run());

    assert_ok!(handle.send(Uuid::nil(), MatchCommand::Reset).await);

    let round = timeout(WAIT, async {
        loop {
            if let Ok(ServerMsg::RoundStarted { round }) = rx.recv().await {
                return round;
            }
        }
    })
    .await
    .expect("timed out waiting for round start");
    assert_eq!(round, 1);
}

#[tokio::test]
async fn host_stops_when_every_handle_is_dropped() {
    let (host, handle) = GameMatch::new(240, true);
    let task = tokio::spawn(host.run());

    drop(handle);

    timeout(WAIT, task)
        .await
        .expect("host kept running")
        .unwrap();
}
