//! Per-frame simulation tick
//!
//! The frame driver calls `tick` exactly once per display refresh with the
//! input intents buffered since the previous frame, then clears the
//! one-shot fields and drains the event queue.

use rand::Rng;

use super::state::{GameEvent, GamePhase, GameState, MoveDir, Obstacle, Star};

/// Input intents for a single tick
///
/// Event handlers only assign fields here; nothing reads simulation state
/// from a handler. One-shot fields (`jump`, `restart`, `toggle_mute`) and
/// the edge options are cleared by the driver after each tick.
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Jump key edge; doubles as the restart signal after a game over
    pub jump: bool,
    /// Latest horizontal key edge, if any arrived this frame
    pub move_dir: Option<MoveDir>,
    /// Lift key edge (down = Some(true), up = Some(false))
    pub hold_lift: Option<bool>,
    /// Explicit restart signal (host button)
    pub restart: bool,
    /// Mute toggle
    pub toggle_mute: bool,
}

/// What the spawner produces when the timer fires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnKind {
    Obstacle,
    Star,
}

/// Pure spawn-kind decision so tests can force draws
#[inline]
pub fn choose_spawn(roll: f32, star_chance: f32) -> SpawnKind {
    if roll < star_chance {
        SpawnKind::Star
    } else {
        SpawnKind::Obstacle
    }
}

/// Advance the session by one frame
pub fn tick(state: &mut GameState, input: &TickInput) {
    let tuning = state.tuning;

    if input.toggle_mute {
        state.muted = !state.muted;
        state.push_event(GameEvent::MuteToggled { muted: state.muted });
    }

    // Movement intents land regardless of phase; they only take effect
    // once the character integrates again
    if let Some(dir) = input.move_dir {
        state.player.set_move_dir(dir, &tuning);
    }
    if let Some(held) = input.hold_lift {
        state.player.set_holding_lift(held);
    }

    match state.phase {
        GamePhase::GameOver => {
            // Frozen until an explicit restart; jump doubles as restart
            if input.restart || input.jump {
                reset(state);
            }
            return;
        }
        GamePhase::Running => {}
    }

    if input.jump {
        state.player.jump(&tuning);
    }

    // 1. Spawn scheduling
    state.spawn_timer += 1;
    if state.spawn_timer >= state.spawn_interval {
        let roll: f32 = state.rng.random();
        match choose_spawn(roll, tuning.star_chance) {
            SpawnKind::Star => {
                let band_t: f32 = state.rng.random();
                state
                    .stars
                    .push(Star::new(state.viewport.width, band_t, &tuning));
            }
            SpawnKind::Obstacle => {
                state
                    .obstacles
                    .push(Obstacle::new(state.viewport.width, &tuning));
            }
        }
        let jitter = state.rng.random_range(0..tuning.spawn_jitter);
        state.spawn_interval = (tuning.base_spawn_interval + jitter).max(tuning.min_spawn_interval);
        state.spawn_timer = 0;
    }

    // 2. Scroll and prune obstacles
    let scroll = state.scroll_speed;
    for obstacle in &mut state.obstacles {
        obstacle.advance(scroll);
    }
    state.obstacles.retain(|o| !o.off_screen());

    // 3. Scroll stars, resolve collection, prune
    let player_box = state.player.aabb();
    let mut collected = 0u32;
    for star in &mut state.stars {
        star.advance(scroll);
        if star.try_collect(&player_box) {
            collected += 1;
        }
    }
    for _ in 0..collected {
        state.bonus_points += tuning.star_points;
        state.push_event(GameEvent::StarCollected {
            points: tuning.star_points,
        });
    }
    state.stars.retain(|s| !s.off_screen());

    // 4. Collision sweep; the first hit ends the frame
    let hit = state
        .obstacles
        .iter()
        .any(|o| o.aabb(tuning.ground_y).intersects(&player_box));
    if hit {
        game_over(state);
        return;
    }

    // 5. Distance score
    state.score += 1;

    // 6. Character physics, after the world pass like the original frame order
    let viewport = state.viewport;
    state.player.update(&viewport, &tuning);
}

/// Terminal transition: freeze the world and tell the host
fn game_over(state: &mut GameState) {
    if state.phase == GamePhase::GameOver {
        return;
    }
    state.phase = GamePhase::GameOver;
    state.scroll_speed = 0.0;
    state.push_event(GameEvent::GameOver);
    log::info!(
        "game over at distance {} with {} bonus points",
        state.distance(),
        state.bonus_points
    );
}

/// Full state reset back to a fresh run
pub fn reset(state: &mut GameState) {
    let tuning = state.tuning;
    state.obstacles.clear();
    state.stars.clear();
    state.spawn_timer = 0;
    state.spawn_interval = tuning.base_spawn_interval;
    state.score = 0;
    state.bonus_points = 0;
    state.scroll_speed = tuning.scroll_speed;
    state.player.reset(&tuning);
    state.phase = GamePhase::Running;
    state.push_event(GameEvent::Restarted);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Viewport;
    use crate::tuning::Tuning;
    use glam::Vec2;
    use proptest::prelude::*;

    fn new_state() -> GameState {
        GameState::new(
            7,
            Viewport::new(1200.0, 700.0).unwrap(),
            Tuning::default(),
        )
    }

    fn quiet() -> TickInput {
        TickInput::default()
    }

    #[test]
    fn test_choose_spawn_threshold() {
        assert_eq!(choose_spawn(0.1, 0.2), SpawnKind::Star);
        assert_eq!(choose_spawn(0.199, 0.2), SpawnKind::Star);
        assert_eq!(choose_spawn(0.2, 0.2), SpawnKind::Obstacle);
        assert_eq!(choose_spawn(0.9, 0.2), SpawnKind::Obstacle);
        // Stars disabled entirely
        assert_eq!(choose_spawn(0.0, 0.0), SpawnKind::Obstacle);
    }

    #[test]
    fn test_spawn_fires_at_interval_and_redraws() {
        let mut state = new_state();
        state.spawn_timer = state.spawn_interval - 1;

        tick(&mut state, &quiet());

        // Exactly one entity appeared, at the right viewport edge, already
        // advanced once by the scroll pass
        let spawned_x = state
            .obstacles
            .iter()
            .map(|o| o.x)
            .chain(state.stars.iter().map(|s| s.pos.x))
            .collect::<Vec<_>>();
        assert_eq!(spawned_x.len(), 1);
        assert_eq!(
            spawned_x[0],
            state.viewport.width - state.tuning.scroll_speed
        );
        assert_eq!(state.spawn_timer, 0);
        // Redrawn interval: max(60, 120 + [0, 60)) = [120, 180)
        assert!(state.spawn_interval >= state.tuning.min_spawn_interval);
        assert!(state.spawn_interval <= 180);
    }

    #[test]
    fn test_spawn_kinds_follow_seeded_draws() {
        // Run long enough that both kinds appear; the 20% star rate makes
        // obstacles the clear majority
        let mut state = new_state();
        let mut obstacles = 0usize;
        let mut stars = 0usize;
        for _ in 0..20_000 {
            let before = (state.obstacles.len(), state.stars.len());
            tick(&mut state, &quiet());
            // Keep the runway clear so the run never ends
            state.obstacles.retain(|o| o.x > state.player.pos.x + 100.0);
            let after = (state.obstacles.len(), state.stars.len());
            obstacles += after.0.saturating_sub(before.0);
            stars += after.1.saturating_sub(before.1);
        }
        assert!(obstacles > stars);
        assert!(stars > 0);
    }

    #[test]
    fn test_offscreen_entities_pruned() {
        let mut state = new_state();
        let t = state.tuning;
        let mut gone = Obstacle::new(0.0, &t);
        gone.x = -t.obstacle_size.x; // x + width == 0, fully off
        state.obstacles.push(gone);
        state.obstacles.push(Obstacle::new(800.0, &t));

        let mut gone_star = Star::new(0.0, 0.5, &t);
        gone_star.pos.x = -t.star_size.x;
        state.stars.push(gone_star);

        tick(&mut state, &quiet());
        assert_eq!(state.obstacles.len(), 1);
        assert!(state.stars.is_empty());
    }

    #[test]
    fn test_star_awards_bonus_exactly_once() {
        let mut state = new_state();
        let t = state.tuning;
        let mut star = Star::new(state.player.pos.x, 0.0, &t);
        star.pos.y = state.player.pos.y - 30.0;
        // Park it on the player; give it room to stay overlapping next frame
        star.pos.x = state.player.pos.x + t.scroll_speed;
        state.stars.push(star);

        tick(&mut state, &quiet());
        assert_eq!(state.bonus_points, t.star_points);
        assert!(state.stars[0].collected);
        assert!(
            state
                .events
                .contains(&GameEvent::StarCollected { points: t.star_points })
        );

        // Still overlapping, still collected: no second award
        state.drain_events();
        tick(&mut state, &quiet());
        assert_eq!(state.bonus_points, t.star_points);
        assert!(
            !state
                .events
                .iter()
                .any(|e| matches!(e, GameEvent::StarCollected { .. }))
        );
    }

    #[test]
    fn test_obstacle_hit_transitions_to_game_over() {
        let mut state = new_state();
        let t = state.tuning;
        // Obstacle parked on the player's box
        let mut obstacle = Obstacle::new(state.player.pos.x, &t);
        obstacle.x = state.player.pos.x + t.scroll_speed;
        state.obstacles.push(obstacle);

        let score_before = state.score;
        tick(&mut state, &quiet());

        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.scroll_speed, 0.0);
        assert!(state.events.contains(&GameEvent::GameOver));
        // Transition frame ends before the score step
        assert_eq!(state.score, score_before);
    }

    #[test]
    fn test_game_over_is_idempotent() {
        let mut state = new_state();
        let t = state.tuning;
        let mut obstacle = Obstacle::new(state.player.pos.x, &t);
        obstacle.x = state.player.pos.x + t.scroll_speed;
        state.obstacles.push(obstacle);
        tick(&mut state, &quiet());
        assert_eq!(state.phase, GamePhase::GameOver);
        state.drain_events();

        let score = state.score;
        let obstacles = state.obstacles.len();
        for _ in 0..10 {
            tick(&mut state, &quiet());
        }
        assert_eq!(state.score, score);
        assert_eq!(state.scroll_speed, 0.0);
        assert_eq!(state.obstacles.len(), obstacles);
        assert!(state.events.is_empty());
    }

    #[test]
    fn test_jump_scenario() {
        let mut state = new_state();
        let t = state.tuning;
        let y_before = state.player.pos.y;

        let input = TickInput {
            jump: true,
            ..TickInput::default()
        };
        tick(&mut state, &input);

        // Launch velocity minus one frame of gravity already applied
        assert!(state.player.airborne);
        assert_eq!(state.player.vel.y, t.jump_force + t.gravity);
        assert!(state.player.pos.y < y_before);
    }

    #[test]
    fn test_restart_via_jump_after_game_over() {
        let mut state = new_state();
        let t = state.tuning;
        let mut obstacle = Obstacle::new(state.player.pos.x, &t);
        obstacle.x = state.player.pos.x + t.scroll_speed;
        state.obstacles.push(obstacle);
        state.score = 0;
        // A few frames of play first
        for _ in 0..3 {
            tick(&mut state, &quiet());
        }
        assert_eq!(state.phase, GamePhase::GameOver);
        state.drain_events();

        let input = TickInput {
            jump: true,
            ..TickInput::default()
        };
        tick(&mut state, &input);

        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.score, 0);
        assert_eq!(state.bonus_points, 0);
        assert!(state.obstacles.is_empty());
        assert!(state.stars.is_empty());
        assert_eq!(state.scroll_speed, t.scroll_speed);
        assert_eq!(state.spawn_timer, 0);
        assert_eq!(state.spawn_interval, t.base_spawn_interval);
        assert_eq!(
            state.player.pos,
            Vec2::new(t.player_start_x, t.ground_y)
        );
        assert!(state.events.contains(&GameEvent::Restarted));
    }

    #[test]
    fn test_mute_toggle_flips_and_reports() {
        let mut state = new_state();
        let input = TickInput {
            toggle_mute: true,
            ..TickInput::default()
        };

        tick(&mut state, &input);
        assert!(state.muted);
        assert!(state.events.contains(&GameEvent::MuteToggled { muted: true }));

        state.drain_events();
        tick(&mut state, &input);
        assert!(!state.muted);
        assert!(state.events.contains(&GameEvent::MuteToggled { muted: false }));
    }

    #[test]
    fn test_score_counts_running_frames_only() {
        let mut state = new_state();
        for _ in 0..50 {
            tick(&mut state, &quiet());
        }
        assert_eq!(state.score, 50);
        assert_eq!(state.distance(), 50 / state.tuning.distance_divisor);
    }

    #[test]
    fn test_drain_events_empties_queue() {
        let mut state = new_state();
        let input = TickInput {
            toggle_mute: true,
            ..TickInput::default()
        };
        tick(&mut state, &input);
        assert!(!state.events.is_empty());
        let drained = state.drain_events();
        assert_eq!(drained.len(), 1);
        assert!(state.events.is_empty());
    }

    proptest! {
        // Whatever the input stream, the character never leaves the viewport
        #[test]
        fn prop_player_stays_in_viewport(frames in prop::collection::vec(0u8..6, 1..200)) {
            let mut state = new_state();
            for f in frames {
                let input = TickInput {
                    jump: f == 1,
                    move_dir: match f {
                        2 => Some(MoveDir::Left),
                        3 => Some(MoveDir::Right),
                        4 => Some(MoveDir::Halt),
                        _ => None,
                    },
                    hold_lift: (f == 5).then_some(true),
                    ..TickInput::default()
                };
                tick(&mut state, &input);
                let max_x = state.viewport.width - state.player.size.x;
                prop_assert!(state.player.pos.x >= 0.0);
                prop_assert!(state.player.pos.x <= max_x);
                prop_assert!(state.player.pos.y <= state.tuning.ground_y);
            }
        }
    }
}
