/// The digit display as seen by the control core
pub trait DisplayAdapter {
    fn set_color(&mut self, r: u8, g: u8, b: u8);
    /// Show `digit` (0..=9)
    fn render_digit(&mut self, digit: u8);
    fn clear(&mut self);
}
