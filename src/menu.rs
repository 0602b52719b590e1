/// Cursor over a fixed list of menu entries; moves wrap around both ends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuCursor {
    index: usize,
    len: usize,
}

impl MenuCursor {
    pub fn new(len: usize) -> Self {
        Self { index: 0, len }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn up(&mut self) {
        if self.len > 0 {
            self.index = (self.index + self.len - 1) % self.len;
        }
    }

    pub fn down(&mut self) {
        if self.len > 0 {
            self.index = (self.index + 1) % self.len;
        }
    }

    pub fn reset(&mut self) {
        self.index = 0;
    }
}

pub const MAIN_MENU_ITEMS: [&str; 3] = ["Play", "Practice", "Settings"];
pub const PLAY_MENU_ITEMS: [&str; 2] = ["Receive", "Transmit"];
pub const PRACTICE_MENU_ITEMS: [&str; 2] = ["Practice Receiving", "Practice Transmitting"];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_in_both_directions() {
        let mut cursor = MenuCursor::new(3);
        cursor.up();
        assert_eq!(cursor.index(), 2);
        cursor.down();
        assert_eq!(cursor.index(), 0);
        cursor.down();
        cursor.down();
        cursor.down();
        assert_eq!(cursor.index(), 0);
    }

    #[test]
    fn reset_returns_to_first_item() {
        let mut cursor = MenuCursor::new(2);
        cursor.down();
        cursor.reset();
        assert_eq!(cursor.index(), 0);
    }

    #[test]
    fn empty_menu_stays_put() {
        let mut cursor = MenuCursor::new(0);
        cursor.up();
        cursor.down();
        assert_eq!(cursor.index(), 0);
    }
}
