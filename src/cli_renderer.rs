use crate::entity::Rect;
use crate::game::{Game, MenuLayout, Mode, TITLE};
use crate::renderer::{Input, Renderer};
use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    },
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, ClearType},
};
use std::io::{self, Write};
use std::time::Duration;

/// Virtual pixels covered by one terminal cell.
pub const CELL_WIDTH: f32 = 8.0;
pub const CELL_HEIGHT: f32 = 16.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cell {
    Empty,
    Pipe,
    Bird,
}

pub struct CliRenderer {
    cols: u16,
    rows: u16,
    active: bool,
}

impl CliRenderer {
    pub fn new(cols: u16, rows: u16) -> Self {
        Self {
            cols,
            rows,
            active: false,
        }
    }

    /// Pixel size of the playfield this terminal can show.
    pub fn screen_size(&self) -> (f32, f32) {
        (self.cols as f32 * CELL_WIDTH, self.rows as f32 * CELL_HEIGHT)
    }

    fn cell_center(col: u16, row: u16) -> (f32, f32) {
        (
            (col as f32 + 0.5) * CELL_WIDTH,
            (row as f32 + 0.5) * CELL_HEIGHT,
        )
    }

    fn pixel_to_row(y: f32) -> u16 {
        (y / CELL_HEIGHT).max(0.0) as u16
    }

    fn classify(game: &Game, col: u16, row: u16) -> Cell {
        let (x, y) = Self::cell_center(col, row);
        if game.bird.rect().contains(x, y) {
            return Cell::Bird;
        }
        if game.obstacles().any(|rect| rect.contains(x, y)) {
            return Cell::Pipe;
        }
        Cell::Empty
    }

    fn draw_scene(&self, game: &Game, stdout: &mut impl Write) -> io::Result<()> {
        for row in 0..self.rows {
            queue!(stdout, cursor::MoveTo(0, row))?;
            for col in 0..self.cols {
                match Self::classify(game, col, row) {
                    Cell::Empty => queue!(stdout, SetBackgroundColor(Color::White), Print(" "))?,
                    Cell::Pipe => queue!(stdout, SetBackgroundColor(Color::Black), Print(" "))?,
                    Cell::Bird => queue!(
                        stdout,
                        SetBackgroundColor(Color::DarkGrey),
                        SetForegroundColor(Color::Yellow),
                        Print("#")
                    )?,
                }
            }
        }
        queue!(stdout, ResetColor)?;
        Ok(())
    }

    fn draw_centered(&self, text: &str, row: u16, stdout: &mut impl Write) -> io::Result<()> {
        let col = (self.cols as usize).saturating_sub(text.chars().count()) / 2;
        queue!(stdout, cursor::MoveTo(col as u16, row), Print(text))?;
        Ok(())
    }

    /// Baseline sits on the bottom of the text line, so the label goes one row up.
    fn button_row(button: &Rect) -> u16 {
        Self::pixel_to_row(MenuLayout::baseline(button)).saturating_sub(1)
    }

    fn draw_button(&self, label: &str, button: &Rect, stdout: &mut impl Write) -> io::Result<()> {
        self.draw_centered(&format!("[ {} ]", label), Self::button_row(button), stdout)
    }

    /// Bottom row for the menu hint, unless a button label already sits there.
    fn hint_row(&self, game: &Game) -> Option<u16> {
        let row = self.rows.checked_sub(1)?;
        let taken = [&game.menu.play_button, &game.menu.quit_button]
            .into_iter()
            .any(|button| Self::button_row(button) >= row);
        (!taken).then_some(row)
    }

    fn draw_frame(&self, game: &Game, out: &mut impl Write) -> io::Result<()> {
        match game.mode {
            Mode::Playing => self.draw_scene(game, out)?,
            Mode::Menu => self.draw_menu(game, out)?,
        }
        self.draw_score(game, out)?;
        out.flush()
    }

    fn draw_menu(&self, game: &Game, stdout: &mut impl Write) -> io::Result<()> {
        // Overpaint every cell; no Clear(All) per frame
        let blank = " ".repeat(self.cols as usize);
        queue!(stdout, SetBackgroundColor(Color::White), SetForegroundColor(Color::Black))?;
        for row in 0..self.rows {
            queue!(stdout, cursor::MoveTo(0, row), Print(&blank))?;
        }
        self.draw_centered(TITLE, Self::pixel_to_row(game.menu.title_y), stdout)?;
        self.draw_centered(game.message, Self::pixel_to_row(game.menu.message_y), stdout)?;
        self.draw_button("Play", &game.menu.play_button, stdout)?;
        self.draw_button("Quit", &game.menu.quit_button, stdout)?;
        Ok(())
    }

    fn draw_score(&self, game: &Game, stdout: &mut impl Write) -> io::Result<()> {
        queue!(
            stdout,
            cursor::MoveTo(1, 0),
            SetBackgroundColor(Color::White),
            SetForegroundColor(Color::Black),
            Print(format!("Score: {}", game.score)),
        )?;

        if game.mode == Mode::Menu {
            if let Some(row) = self.hint_row(game) {
                let hint = "Click a button | Space: play | Q: quit";
                queue!(stdout, cursor::MoveTo(1, row), Print(hint))?;
            }
        }

        queue!(stdout, ResetColor)?;
        Ok(())
    }

    fn translate_key(key: KeyEvent) -> Option<Input> {
        if key.kind == KeyEventKind::Release {
            return None;
        }
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                Some(Input::Quit)
            }
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Some(Input::Quit),
            KeyCode::Char(' ') | KeyCode::Up | KeyCode::Enter => Some(Input::Flap),
            _ => None,
        }
    }

    fn translate_mouse(mouse: MouseEvent) -> Option<Input> {
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                let (x, y) = Self::cell_center(mouse.column, mouse.row);
                Some(Input::Tap { x, y })
            }
            _ => None,
        }
    }
}

impl Renderer for CliRenderer {
    fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(
            stdout,
            terminal::EnterAlternateScreen,
            EnableMouseCapture,
            terminal::Clear(ClearType::All),
            cursor::Hide
        )?;
        self.active = true;
        Ok(())
    }

    fn render(&mut self, game: &Game) -> io::Result<()> {
        let mut stdout = io::stdout();
        self.draw_frame(game, &mut stdout)
    }

    fn cleanup(&mut self) -> io::Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;
        let mut stdout = io::stdout();
        execute!(
            stdout,
            DisableMouseCapture,
            cursor::Show,
            terminal::LeaveAlternateScreen,
            ResetColor
        )?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    fn poll_input(&mut self) -> io::Result<Option<Input>> {
        while event::poll(Duration::ZERO)? {
            let input = match event::read()? {
                Event::Key(key) => Self::translate_key(key),
                Event::Mouse(mouse) => Self::translate_mouse(mouse),
                _ => None,
            };
            if input.is_some() {
                return Ok(input);
            }
        }
        Ok(None)
    }
}

impl Drop for CliRenderer {
    fn drop(&mut self) {
        let _ = self.cleanup();
    }
}
