//! Seven-day price trend drawn with block characters for a table cell.

const BARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Downsample `prices` to at most `width` points and map each to a bar.
pub fn sparkline(prices: &[f64], width: usize) -> String {
    if prices.is_empty() || width == 0 {
        return String::new();
    }
    let points: Vec<f64> = if prices.len() <= width {
        prices.to_vec()
    } else {
        (0..width)
            .map(|i| prices[i * (prices.len() - 1) / (width - 1).max(1)])
            .collect()
    };

    let min = points.iter().copied().fold(f64::INFINITY, f64::min);
    let max = points.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let span = max - min;

    points
        .iter()
        .map(|p| {
            if span <= f64::EPSILON {
                BARS[BARS.len() / 2]
            } else {
                let level = ((p - min) / span * (BARS.len() - 1) as f64).round() as usize;
                BARS[level.min(BARS.len() - 1)]
            }
        })
        .collect()
}
