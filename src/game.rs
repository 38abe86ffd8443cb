use crate::config::Config;
use crate::entity::{Bird, PipePair, Rect};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

pub const TITLE: &str = "FlappyBox";

pub const MESSAGES: &[&str] = &[
    "made in 1 day",
    "flappy bird ripoff smh",
    "do NOT play Fortnite",
    "only 213 lines of code",
    "do NOT report any bugs",
    "Android > iOS",
    "ive played these games before",
    "imagine if there were ads in this",
    "made using no textures",
    "this message has 10% chance to appear",
];

// Menu button geometry, relative to each label's baseline
const BUTTON_HALF_WIDTH: f32 = 100.0;
const BUTTON_ABOVE: f32 = 60.0;
const BUTTON_BELOW: f32 = 20.0;
const BUTTON_SPACING: f32 = 80.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Menu,
    Playing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapOutcome {
    Started,
    Jumped,
    Quit,
    Ignored,
}

/// What happened during one tick, for renderers and logging.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickEvents {
    pub scored: u32,
    pub died: bool,
}

#[derive(Debug, Clone)]
pub struct MenuLayout {
    pub title_y: f32,
    pub message_y: f32,
    pub play_button: Rect,
    pub quit_button: Rect,
}

impl MenuLayout {
    pub fn new(width: f32, height: f32) -> Self {
        let center_x = width / 2.0;
        let play_y = height / 2.0;
        let quit_y = play_y + BUTTON_SPACING;
        Self {
            title_y: height / 3.0,
            message_y: height / 2.5,
            play_button: Self::button(center_x, play_y),
            quit_button: Self::button(center_x, quit_y),
        }
    }

    fn button(center_x: f32, baseline: f32) -> Rect {
        Rect::new(
            center_x - BUTTON_HALF_WIDTH,
            baseline - BUTTON_ABOVE,
            center_x + BUTTON_HALF_WIDTH,
            baseline + BUTTON_BELOW,
        )
    }

    /// Label baseline for a button built by `button`.
    pub fn baseline(button: &Rect) -> f32 {
        button.top + BUTTON_ABOVE
    }
}

pub struct Game {
    pub config: Config,
    pub bird: Bird,
    pub pipes: Vec<PipePair>,
    pub score: u32,
    pub mode: Mode,
    pub message: &'static str,
    pub menu: MenuLayout,
    rng: StdRng,
}

impl Game {
    pub fn new(width: f32, height: f32) -> Self {
        Self::with_rng(width, height, StdRng::from_entropy())
    }

    pub fn with_seed(width: f32, height: f32, seed: u64) -> Self {
        Self::with_rng(width, height, StdRng::seed_from_u64(seed))
    }

    fn with_rng(width: f32, height: f32, rng: StdRng) -> Self {
        let config = Config::for_screen(width, height);
        let mut game = Self {
            config,
            bird: Bird::new(config.bird_x, height / 2.0, config.bird_size),
            pipes: Vec::new(),
            score: 0,
            mode: Mode::Menu,
            message: MESSAGES[0],
            menu: MenuLayout::new(width, height),
            rng,
        };
        game.reroll_message();
        game.spawn_pipe();
        game
    }

    /// Flattened obstacle view: upper, lower, upper, lower, ...
    pub fn obstacles(&self) -> impl Iterator<Item = &Rect> + '_ {
        self.pipes
            .iter()
            .flat_map(|pair| [&pair.upper, &pair.lower])
    }

    pub fn reset(&mut self) {
        self.bird = Bird::new(self.config.bird_x, self.config.height / 2.0, self.config.bird_size);
        self.pipes.clear();
        self.spawn_pipe();
        self.score = 0;
    }

    pub fn tap(&mut self, x: f32, y: f32) -> TapOutcome {
        match self.mode {
            Mode::Playing => self.jump(),
            Mode::Menu if self.menu.play_button.contains(x, y) => self.start(),
            Mode::Menu if self.menu.quit_button.contains(x, y) => {
                log::info!("Quit selected from menu");
                TapOutcome::Quit
            }
            Mode::Menu => TapOutcome::Ignored,
        }
    }

    /// Keyboard shortcut: jump while playing, start a round from the menu.
    pub fn flap(&mut self) -> TapOutcome {
        match self.mode {
            Mode::Playing => self.jump(),
            Mode::Menu => self.start(),
        }
    }

    fn start(&mut self) -> TapOutcome {
        self.mode = Mode::Playing;
        self.reset();
        log::info!("Game started");
        TapOutcome::Started
    }

    fn jump(&mut self) -> TapOutcome {
        self.bird.jump(self.config.jump_velocity);
        TapOutcome::Jumped
    }

    pub fn tick(&mut self) -> TickEvents {
        let mut events = TickEvents::default();
        if self.mode != Mode::Playing {
            return events;
        }

        self.bird.fall(self.config.gravity);

        for pair in &mut self.pipes {
            pair.scroll(self.config.scroll_speed);
        }

        let needs_pipe = self
            .pipes
            .last()
            .map_or(true, |newest| newest.left() < self.config.spawn_threshold);
        if needs_pipe {
            self.spawn_pipe();
        }

        self.pipes.retain(|pair| pair.right() >= 0.0);

        let bird_rect = self.bird.rect();
        let collision = self.pipes.iter().any(|pair| pair.hits(&bird_rect));
        let out_of_bounds =
            self.bird.y < 0.0 || self.bird.y + self.bird.size > self.config.height;

        if collision || out_of_bounds {
            self.mode = Mode::Menu;
            self.reroll_message();
            events.died = true;
            log::info!("Game over with score {}", self.score);
        }

        // Scoring runs even on the death tick
        let bird_x = self.bird.x;
        let mut scored = 0;
        self.pipes.retain_mut(|pair| {
            if !pair.scored && bird_x > pair.right() {
                pair.scored = true;
                scored += 1;
                false
            } else {
                true
            }
        });
        self.score += scored;
        events.scored = scored;

        events
    }

    fn spawn_pipe(&mut self) {
        let (lo, hi) = (self.config.gap_top_min, self.config.gap_top_max);
        let gap_top = if lo < hi { self.rng.gen_range(lo..hi) } else { lo };
        log::debug!("Spawning pipe pair with gap top at {}", gap_top);
        self.pipes.push(PipePair::new(
            self.config.width,
            self.config.pipe_width,
            gap_top as f32,
            self.config.gap,
            self.config.height,
        ));
    }

    fn reroll_message(&mut self) {
        if let Some(message) = MESSAGES.choose(&mut self.rng) {
            self.message = *message;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const WIDTH: f32 = 720.0;
    const HEIGHT: f32 = 1200.0;

    fn playing_game(seed: u64) -> Game {
        let mut game = Game::with_seed(WIDTH, HEIGHT, seed);
        assert_eq!(game.flap(), TapOutcome::Started);
        game
    }

    /// Keep the bird parked in the middle of the first gap so it survives.
    fn steer_through_gap(game: &mut Game) {
        let bird_x = game.bird.x;
        let size = game.bird.size;
        let target = game
            .pipes
            .iter()
            .find(|p| p.right() >= bird_x)
            .map(|p| p.upper.bottom + (p.lower.top - p.upper.bottom - size) / 2.0);
        if let Some(target) = target {
            game.bird.y = target;
            game.bird.velocity = 0.0;
        }
    }

    proptest! {
        #[test]
        fn prop_velocity_accumulates_gravity(
            seed in any::<u64>(),
            ticks in 1usize..30,
        ) {
            let mut game = playing_game(seed);
            for _ in 0..ticks {
                if game.mode != Mode::Playing {
                    break;
                }
                let before = game.bird.velocity;
                game.tick();
                prop_assert_eq!(game.bird.velocity, before + game.config.gravity);
            }
        }

        #[test]
        fn prop_tap_while_playing_sets_jump_velocity(
            seed in any::<u64>(),
            prior in -50.0f32..50.0,
            x in 0.0f32..WIDTH,
            y in 0.0f32..HEIGHT,
        ) {
            let mut game = playing_game(seed);
            game.bird.velocity = prior;
            prop_assert_eq!(game.tap(x, y), TapOutcome::Jumped);
            prop_assert_eq!(game.bird.velocity, game.config.jump_velocity);
        }

        #[test]
        fn prop_obstacles_come_in_matching_pairs(
            seed in any::<u64>(),
            taps in prop::collection::vec(any::<bool>(), 0..300),
        ) {
            let mut game = playing_game(seed);
            for tap in taps {
                if tap {
                    game.flap();
                }
                game.tick();
                let rects: Vec<&Rect> = game.obstacles().collect();
                prop_assert_eq!(rects.len() % 2, 0);
                for pair in rects.chunks(2) {
                    prop_assert_eq!(pair[0].left, pair[1].left);
                    prop_assert_eq!(pair[0].right, pair[1].right);
                    prop_assert!(pair[0].bottom < pair[1].top);
                }
            }
        }

        #[test]
        fn prop_gap_stays_within_band(seed in any::<u64>()) {
            let game = Game::with_seed(WIDTH, HEIGHT, seed);
            let pair = &game.pipes[0];
            prop_assert!(pair.upper.bottom >= (HEIGHT as i32 / 5) as f32);
            prop_assert!(pair.upper.bottom < (HEIGHT as i32 / 2) as f32);
            prop_assert_eq!(pair.lower.top - pair.upper.bottom, game.config.gap);
            prop_assert_eq!(pair.lower.bottom, HEIGHT);
        }

        #[test]
        fn prop_score_counts_each_pair_once(seed in any::<u64>()) {
            let mut game = playing_game(seed);
            let mut passed = 0;
            for _ in 0..600 {
                steer_through_gap(&mut game);
                let before: Vec<f32> = game
                    .pipes
                    .iter()
                    .filter(|p| game.bird.x > p.right() - game.config.scroll_speed)
                    .map(|p| p.right())
                    .collect();
                let events = game.tick();
                prop_assert_eq!(game.mode, Mode::Playing);
                prop_assert_eq!(events.scored as usize, before.len());
                passed += before.len() as u32;
                prop_assert_eq!(game.score, passed);
                prop_assert!(game.pipes.iter().all(|p| p.right() >= game.bird.x));
            }
            prop_assert!(game.score > 0);
        }

        #[test]
        fn prop_menu_ticks_are_inert(seed in any::<u64>(), ticks in 1usize..50) {
            let mut game = Game::with_seed(WIDTH, HEIGHT, seed);
            let message = game.message;
            let y = game.bird.y;
            let left = game.pipes[0].left();
            for _ in 0..ticks {
                prop_assert_eq!(game.tick(), TickEvents::default());
            }
            prop_assert_eq!(game.message, message);
            prop_assert_eq!(game.bird.y, y);
            prop_assert_eq!(game.pipes[0].left(), left);
        }
    }

    #[test]
    fn test_five_ticks_of_free_fall() {
        let mut game = playing_game(7);
        assert_eq!(game.bird.y, 600.0);
        for _ in 0..5 {
            game.tick();
        }
        assert_eq!(game.bird.y, 630.0);
        assert_eq!(game.bird.velocity, 10.0);
        assert_eq!(game.mode, Mode::Playing);
    }

    #[test]
    fn test_collision_with_pipe_ends_round() {
        let mut game = playing_game(1);
        game.pipes.clear();
        let mut pair = PipePair::new(120.0, 50.0, 120.0, 2000.0, HEIGHT);
        // The scroll step runs before the collision test
        pair.scroll(-game.config.scroll_speed);
        game.pipes.push(pair);
        game.bird = Bird::new(100.0, 100.0, 50.0);
        game.bird.velocity = -game.config.gravity;

        let events = game.tick();

        assert!(game.bird.rect().intersects(&Rect::new(120.0, 0.0, 170.0, 120.0)));
        assert!(events.died);
        assert_eq!(game.mode, Mode::Menu);
    }

    #[test]
    fn test_falling_off_screen_ends_round_without_pipes() {
        let mut game = playing_game(2);
        game.pipes.clear();
        game.bird.y = HEIGHT - game.bird.size;
        game.bird.velocity = 0.0;

        let events = game.tick();

        assert!(events.died);
        assert_eq!(game.mode, Mode::Menu);
        assert_eq!(game.pipes.len(), 1);
        let bird = game.bird.rect();
        assert!(game.pipes.iter().all(|pair| !pair.hits(&bird)));
    }

    #[test]
    fn test_empty_pipe_list_is_refilled() {
        let mut game = playing_game(12);
        game.pipes.clear();

        let events = game.tick();

        assert!(!events.died);
        assert_eq!(game.pipes.len(), 1);
        assert_eq!(game.pipes[0].left(), WIDTH);
        assert!(!game.pipes[0].scored);
    }

    #[test]
    fn test_pair_passed_on_death_tick_still_scores() {
        let mut game = playing_game(13);
        game.pipes.clear();
        game.config.spawn_threshold = f32::NEG_INFINITY;
        let bird_x = game.bird.x;
        game.pipes.push(PipePair::new(bird_x - 20.0, 10.0, 0.0, HEIGHT, HEIGHT));
        game.pipes.push(PipePair::new(WIDTH, 10.0, 0.0, HEIGHT, HEIGHT));
        game.bird.y = HEIGHT;

        let events = game.tick();

        assert!(events.died);
        assert_eq!(game.mode, Mode::Menu);
        assert_eq!(events.scored, 1);
        assert_eq!(game.score, 1);
        assert_eq!(game.pipes.len(), 1);
        assert_eq!(game.pipes[0].left(), WIDTH - game.config.scroll_speed);
    }

    #[test]
    fn test_flying_above_screen_ends_round() {
        let mut game = playing_game(3);
        game.bird.y = 1.0;
        game.bird.velocity = -20.0;
        game.tick();
        assert_eq!(game.mode, Mode::Menu);
    }

    #[test]
    fn test_pair_spawns_once_newest_crosses_threshold() {
        let mut game = playing_game(4);
        assert_eq!(game.pipes.len(), 1);
        // 720 - 6n < 480 first holds at n = 41
        for _ in 0..40 {
            steer_through_gap(&mut game);
            game.tick();
        }
        assert_eq!(game.pipes.len(), 1);
        steer_through_gap(&mut game);
        game.tick();
        assert_eq!(game.pipes.len(), 2);
        assert_eq!(game.pipes[1].left(), WIDTH);
    }

    #[test]
    fn test_scored_pair_is_removed_and_flagged() {
        let mut game = playing_game(5);
        game.pipes.clear();
        game.config.spawn_threshold = f32::NEG_INFINITY;
        let bird_x = game.bird.x;
        game.pipes.push(PipePair::new(bird_x - 20.0, 10.0, 0.0, HEIGHT, HEIGHT));
        game.pipes.push(PipePair::new(WIDTH, 10.0, 0.0, HEIGHT, HEIGHT));

        let events = game.tick();

        assert_eq!(events.scored, 1);
        assert_eq!(game.score, 1);
        assert_eq!(game.pipes.len(), 1);
        assert!(!game.pipes[0].scored);
    }

    #[test]
    fn test_offscreen_pair_is_despawned() {
        let mut game = playing_game(6);
        game.pipes.clear();
        game.config.spawn_threshold = f32::NEG_INFINITY;
        let mut gone = PipePair::new(-30.0, 10.0, 0.0, HEIGHT, HEIGHT);
        gone.scored = true;
        game.pipes.push(gone);
        game.pipes.push(PipePair::new(WIDTH, 10.0, 0.0, HEIGHT, HEIGHT));

        let events = game.tick();

        assert_eq!(events.scored, 0);
        assert_eq!(game.pipes.len(), 1);
        assert_eq!(game.score, 0);
    }

    #[test]
    fn test_menu_buttons() {
        let mut game = Game::with_seed(WIDTH, HEIGHT, 8);
        let quit = game.menu.quit_button;
        assert_eq!(game.tap(quit.center_x(), MenuLayout::baseline(&quit)), TapOutcome::Quit);
        assert_eq!(game.mode, Mode::Menu);

        assert_eq!(game.tap(5.0, 5.0), TapOutcome::Ignored);
        assert_eq!(game.mode, Mode::Menu);

        let play = game.menu.play_button;
        assert_eq!(game.tap(play.center_x(), play.top + 1.0), TapOutcome::Started);
        assert_eq!(game.mode, Mode::Playing);
    }

    #[test]
    fn test_menu_layout_matches_screen() {
        let layout = MenuLayout::new(WIDTH, HEIGHT);
        assert_eq!(layout.play_button, Rect::new(260.0, 540.0, 460.0, 620.0));
        assert_eq!(layout.quit_button, Rect::new(260.0, 620.0, 460.0, 700.0));
        assert_eq!(layout.title_y, 400.0);
        assert_eq!(layout.message_y, 480.0);
    }

    #[test]
    fn test_starting_resets_previous_round() {
        let mut game = playing_game(9);
        game.score = 12;
        game.bird.y = 3.0;
        game.bird.velocity = 40.0;
        game.mode = Mode::Menu;

        game.flap();

        assert_eq!(game.score, 0);
        assert_eq!(game.bird.y, HEIGHT / 2.0);
        assert_eq!(game.bird.velocity, 0.0);
        assert_eq!(game.pipes.len(), 1);
        assert_eq!(game.pipes[0].left(), WIDTH);
    }

    #[test]
    fn test_score_survives_death() {
        let mut game = playing_game(10);
        game.score = 4;
        game.bird.y = HEIGHT;
        game.tick();
        assert_eq!(game.mode, Mode::Menu);
        assert_eq!(game.score, 4);
        assert!(MESSAGES.contains(&game.message));
    }

    #[test]
    fn test_tiny_screen_does_not_panic() {
        let mut game = Game::with_seed(3.0, 3.0, 11);
        game.flap();
        for _ in 0..10 {
            game.tick();
        }
    }
}
