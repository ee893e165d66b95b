//! Frame annotation: rectangle outlines and bitmap text drawn straight
//! onto grayscale buffers.

/// Set one pixel, ignoring coordinates outside the frame.
fn set_px(gray: &mut [u8], width: u32, height: u32, x: i32, y: i32, intensity: u8) {
    if x < 0 || y < 0 || x >= width as i32 || y >= height as i32 {
        return;
    }
    gray[y as usize * width as usize + x as usize] = intensity;
}

/// Draw a one-pixel rectangle outline. `rect` is [x, y, w, h] in frame
/// coordinates; parts outside the frame are clipped.
pub fn draw_rect(gray: &mut [u8], width: u32, height: u32, rect: [f32; 4], intensity: u8) {
    let x1 = rect[0].floor() as i32;
    let y1 = rect[1].floor() as i32;
    let x2 = (rect[0] + rect[2]).ceil() as i32;
    let y2 = (rect[1] + rect[3]).ceil() as i32;

    for x in x1..=x2 {
        set_px(gray, width, height, x, y1, intensity);
        set_px(gray, width, height, x, y2, intensity);
    }
    for y in y1..=y2 {
        set_px(gray, width, height, x1, y, intensity);
        set_px(gray, width, height, x2, y, intensity);
    }
}

/// 3x5 glyph bitmaps, one row per array entry, leftmost column in the
/// high bit. Covers the verdict labels and numeric readouts; anything
/// else renders blank.
fn glyph(ch: char) -> [u8; 5] {
    match ch {
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b111, 0b001, 0b111, 0b100, 0b111],
        '3' => [0b111, 0b001, 0b111, 0b001, 0b111],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b111, 0b001, 0b111],
        '6' => [0b111, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b010, 0b010, 0b010],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b111],
        '.' => [0b000, 0b000, 0b000, 0b000, 0b010],
        'A' => [0b010, 0b101, 0b111, 0b101, 0b101],
        'D' => [0b110, 0b101, 0b101, 0b101, 0b110],
        'E' => [0b111, 0b100, 0b111, 0b100, 0b111],
        'G' => [0b111, 0b100, 0b101, 0b101, 0b111],
        'N' => [0b101, 0b111, 0b111, 0b101, 0b101],
        'O' => [0b111, 0b101, 0b101, 0b101, 0b111],
        'R' => [0b110, 0b101, 0b110, 0b101, 0b101],
        _ => [0b000, 0b000, 0b000, 0b000, 0b000],
    }
}

fn draw_char(
    gray: &mut [u8],
    width: u32,
    height: u32,
    x: i32,
    y: i32,
    ch: char,
    scale: i32,
    intensity: u8,
) {
    let bitmap = glyph(ch);

    for (row, bits) in bitmap.iter().enumerate() {
        for col in 0..3 {
            if (bits >> (2 - col)) & 1 == 1 {
                for dy in 0..scale {
                    for dx in 0..scale {
                        let px = x + col * scale + dx;
                        let py = y + row as i32 * scale + dy;
                        set_px(gray, width, height, px, py, intensity);
                    }
                }
            }
        }
    }
}

/// Draw a text string at (x, y), top-left anchored. Glyphs are 3x5
/// pixels at scale 1 and advance by 4 * scale per character.
pub fn draw_text(
    gray: &mut [u8],
    width: u32,
    height: u32,
    x: i32,
    y: i32,
    text: &str,
    scale: i32,
    intensity: u8,
) {
    let mut cursor_x = x;
    for ch in text.chars() {
        draw_char(gray, width, height, cursor_x, y, ch, scale, intensity);
        cursor_x += 4 * scale;
    }
}
