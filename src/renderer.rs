use crate::game::Game;
use std::io;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Input {
    /// Pointer press in screen pixels - handled contextually based on game mode
    Tap { x: f32, y: f32 },
    /// Keyboard stand-in for a tap: jump, or start from the menu
    Flap,
    Quit,
}

/// Trait that abstracts rendering implementation.
/// This allows for different rendering backends (CLI, Web, etc.)
pub trait Renderer {
    /// Initialize the renderer
    fn init(&mut self) -> io::Result<()>;

    /// Draw one frame of the current game state
    fn render(&mut self, game: &Game) -> io::Result<()>;

    /// Clean up and restore terminal/display state
    fn cleanup(&mut self) -> io::Result<()>;

    /// Poll for input from the user without blocking
    fn poll_input(&mut self) -> io::Result<Option<Input>>;
}
