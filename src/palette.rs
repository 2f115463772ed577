use plotters::style::RGBColor;

/// Categorical colors, cycled by series index
pub const CATEGORY10: [RGBColor; 10] = [
    RGBColor(31, 119, 180),
    RGBColor(255, 127, 14),
    RGBColor(44, 160, 44),
    RGBColor(214, 39, 40),
    RGBColor(148, 103, 189),
    RGBColor(140, 86, 75),
    RGBColor(227, 119, 194),
    RGBColor(127, 127, 127),
    RGBColor(188, 189, 34),
    RGBColor(23, 190, 207),
];

/// Bar fill used by single-series bar charts
pub const BAR_BLUE: RGBColor = RGBColor(70, 130, 180);
pub const BAR_ORANGE: RGBColor = RGBColor(255, 140, 0);
pub const AXIS_GREY: RGBColor = RGBColor(90, 90, 90);

pub fn color_at(index: usize) -> RGBColor {
    CATEGORY10[index % CATEGORY10.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_cycles() {
        assert_eq!(color_at(0), color_at(10));
        assert_ne!(color_at(0), color_at(1));
    }
}
