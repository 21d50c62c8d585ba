use std::io::{self, Write};

use crossterm::{
    cursor::MoveTo,
    queue,
    style::{
        Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
    },
    terminal::{Clear, ClearType},
};
use twenty48_board::engine::Grid;

use crate::palette::{Palette, Rgb};

/// Columns per cell block.
pub const CELL_W: u16 = 8;
/// Rows per cell block.
pub const CELL_H: u16 = 3;
const GAP: u16 = 1;
const ORIGIN: (u16, u16) = (2, 1);

const HELP: &str = "arrows / WASD or drag to move, q to quit";

pub struct View<'a> {
    pub palette: &'a Palette,
    pub show_values: bool,
    /// Cells to draw emphasised; empty when highlighting is off.
    pub highlight: &'a [(usize, usize)],
}

fn color(c: Rgb) -> Color {
    Color::Rgb {
        r: c.0,
        g: c.1,
        b: c.2,
    }
}

/// Text shown on the middle line of a cell block.
pub(crate) fn label(value: u32, show_values: bool, highlighted: bool) -> String {
    let text = match (value, show_values, highlighted) {
        (0, _, _) => String::new(),
        (v, true, _) => v.to_string(),
        (_, false, true) => "◆".to_string(),
        (_, false, false) => String::new(),
    };
    format!("{:^width$}", text, width = CELL_W as usize)
}

/// Draw the whole board. Nothing is flushed until every cell is queued, so
/// a frame is never shown half-drawn.
pub fn draw<W: Write>(out: &mut W, grid: &Grid, view: &View<'_>) -> io::Result<()> {
    queue!(out, Clear(ClearType::All))?;
    let blank = " ".repeat(CELL_W as usize);
    for (r, c, v) in grid.cells() {
        let x = ORIGIN.0 + c as u16 * (CELL_W + GAP);
        let y = ORIGIN.1 + r as u16 * (CELL_H + GAP);
        let highlighted = view.highlight.contains(&(r, c));
        queue!(
            out,
            SetBackgroundColor(color(view.palette.color(v))),
            SetForegroundColor(Color::Black)
        )?;
        if highlighted {
            queue!(out, SetAttribute(Attribute::Bold))?;
        }
        for line in 0..CELL_H {
            let text = if line == CELL_H / 2 {
                label(v, view.show_values, highlighted)
            } else {
                blank.clone()
            };
            queue!(out, MoveTo(x, y + line), Print(text))?;
        }
        queue!(out, SetAttribute(Attribute::Reset), ResetColor)?;
    }
    let size = grid.size() as u16;
    queue!(
        out,
        MoveTo(ORIGIN.0, ORIGIN.1 + size * (CELL_H + GAP)),
        Print(HELP)
    )?;
    out.flush()
}
