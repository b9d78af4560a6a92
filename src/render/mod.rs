use bracket_geometry::prelude::Point;
use bracket_terminal::prelude::*;

use crate::config::DialogueConfig;

/// Maps scene units onto terminal cells.
#[derive(Clone, Copy, Debug)]
pub struct Viewport {
    pub origin: Point,
    pub cell_width: i32,
    pub cell_height: i32,
    pub columns: i32,
    pub rows: i32,
}

impl Viewport {
    pub fn new(origin: Point, cell_width: i32, cell_height: i32, (columns, rows): (i32, i32)) -> Self {
        Self {
            origin,
            cell_width: cell_width.max(1),
            cell_height: cell_height.max(1),
            columns,
            rows,
        }
    }

    pub fn project(&self, point: Point) -> Point {
        Point::new(
            self.origin.x + (point.x / self.cell_width).clamp(0, (self.columns - 1).max(0)),
            self.origin.y + (point.y / self.cell_height).clamp(0, (self.rows - 1).max(0)),
        )
    }
}

pub fn draw_header(ctx: &mut BTerm, frame: u64, clock_ms: u64, player: Point) {
    ctx.print_color_centered(
        0,
        RGB::named(YELLOW),
        RGB::named(BLACK),
        "Crystal Court",
    );
    ctx.print_color_centered(
        1,
        RGB::named(LIGHT_CYAN),
        RGB::named(BLACK),
        format!(
            "Frame {frame} · {:.1}s · You at {},{} · arrows move, space talks",
            clock_ms as f32 / 1000.0,
            player.x,
            player.y
        ),
    );
}

pub fn draw_backdrop(ctx: &mut BTerm, viewport: &Viewport) {
    let grass = RGB::from_u8(40, 90, 40);
    for row in 0..viewport.rows {
        for column in 0..viewport.columns {
            let glyph = if (row * 7 + column * 3) % 11 == 0 {
                b'"'
            } else {
                b'.'
            };
            ctx.set(
                viewport.origin.x + column,
                viewport.origin.y + row,
                grass,
                RGB::named(BLACK),
                glyph as u16,
            );
        }
    }
}

pub fn draw_inventory(ctx: &mut BTerm, viewport: &Viewport, inventory: &[String]) {
    let inner_width = inventory
        .iter()
        .map(|name| text_width(name) + 2)
        .max()
        .unwrap_or(0)
        .max(12);
    let height = inventory.len() as i32 + 2;
    let left = viewport.origin.x + viewport.columns - inner_width - 4;
    let top = viewport.origin.y + 1;
    ctx.draw_box(
        left,
        top,
        inner_width + 2,
        height,
        RGB::named(BLACK),
        RGB::from_u8(230, 230, 230),
    );
    ctx.print_color(
        left + 2,
        top + 1,
        RGB::named(BLACK),
        RGB::from_u8(230, 230, 230),
        "Inventory:",
    );
    for (row, name) in inventory.iter().enumerate() {
        ctx.print_color(
            left + 2,
            top + 2 + row as i32,
            RGB::named(RED),
            RGB::from_u8(230, 230, 230),
            format!("· {name}"),
        );
    }
}

pub fn draw_dialogues(ctx: &mut BTerm, viewport: &Viewport, dialogues: &[&DialogueConfig]) {
    let mut bottom = viewport.origin.y + viewport.rows - 4;
    for dialogue in dialogues {
        let text = format!("\"{}\"", dialogue.line);
        let width = text_width(&text) + 4;
        let left = viewport.origin.x + (viewport.columns - width).max(0) / 2;
        let (fg, bg) = (dialogue.style.fg(), dialogue.style.bg());
        ctx.draw_box(left, bottom - 2, width, 2, fg, bg);
        ctx.print_color(left + 2, bottom - 1, fg, bg, &text);
        bottom -= 4;
    }
}

/// Newest entries first; shows at most `rows` of them.
pub fn draw_log(ctx: &mut BTerm, log: &[String], top: i32, rows: usize) {
    let (width, _) = ctx.get_char_size();
    let shown = log.len().min(rows);
    ctx.draw_box(
        0,
        top,
        width as i32 - 1,
        shown as i32 + 2,
        RGB::named(DARK_GRAY),
        RGB::named(BLACK),
    );
    ctx.print_color(2, top + 1, RGB::named(WHITE), RGB::named(BLACK), "Event Log");
    for (row, entry) in log.iter().take(shown).enumerate() {
        ctx.print(2, top + 2 + row as i32, entry);
    }
}

/// Box width in cells for `text`, counting glyphs rather than bytes.
fn text_width(text: &str) -> i32 {
    text.chars().count() as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn projection_scales_and_clamps() {
        let viewport = Viewport::new(Point::new(0, 3), 16, 24, (80, 30));
        assert_eq!(viewport.project(Point::new(100, 100)), Point::new(6, 7));
        assert_eq!(viewport.project(Point::new(600, 600)), Point::new(37, 28));
        assert_eq!(viewport.project(Point::new(5000, -10)), Point::new(79, 3));
    }

    #[test]
    fn text_width_counts_glyphs() {
        assert_eq!(text_width("Crystal"), 7);
        assert_eq!(text_width("Kristáll · ☼"), 12);
    }
}
